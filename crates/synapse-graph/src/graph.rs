//! Core graph data structures.
//!
//! [`KnowledgeGraph`] is the plain node/edge model the builder returns and
//! callers pass around. [`GraphView`] is a read-only petgraph index over a
//! node/edge slice that the analysis passes share.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use synapse_core::{Edge, Node};
use tracing::debug;

/// A built knowledge graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl KnowledgeGraph {
    /// Gets a node by its id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns the edge between two nodes in either direction.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| {
            (edge.source == a && edge.target == b) || (edge.source == b && edge.target == a)
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds an undirected view for analysis.
    pub fn view(&self) -> GraphView<'_> {
        GraphView::new(&self.nodes, &self.edges)
    }
}

/// Undirected adjacency over a node/edge slice.
///
/// Node indexes in the view match indexes in the input slice. Edges
/// whose endpoints are unknown, self-loops, and repeats of an already seen
/// unordered pair are left out; the rest keep their input order. An id
/// that appears twice resolves to its first node.
#[derive(Debug)]
pub struct GraphView<'a> {
    nodes: &'a [Node],
    graph: UnGraph<(), ()>,
    id_index: HashMap<&'a str, NodeIndex>,
}

impl<'a> GraphView<'a> {
    pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut graph = UnGraph::with_capacity(nodes.len(), edges.len());
        let mut id_index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            let index = graph.add_node(());
            id_index.entry(node.id.as_str()).or_insert(index);
        }

        let mut ignored = 0usize;
        for edge in edges {
            let source = id_index.get(edge.source.as_str()).copied();
            let target = id_index.get(edge.target.as_str()).copied();

            match (source, target) {
                (Some(a), Some(b)) if a != b && graph.find_edge(a, b).is_none() => {
                    graph.add_edge(a, b, ());
                }
                _ => ignored += 1,
            }
        }

        if ignored > 0 {
            debug!("Ignored {} dangling, looping or repeated edges", ignored);
        }

        Self {
            nodes,
            graph,
            id_index,
        }
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of retained edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Gets the node at an index.
    pub fn node(&self, index: usize) -> &'a Node {
        &self.nodes[index]
    }

    /// Gets the index of a node id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).map(|index| index.index())
    }

    /// Number of retained edges touching a node.
    pub fn degree(&self, index: usize) -> usize {
        self.graph.edges(NodeIndex::new(index)).count()
    }

    /// Distinct nodes directly connected to a node.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        self.graph
            .neighbors(NodeIndex::new(index))
            .map(|n| n.index())
            .collect()
    }

    /// Returns true if an edge joins the two nodes.
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    /// Iterates over retained edges as (source, target) indexes, in input order.
    pub fn endpoints(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::NodeKind;

    fn node(id: &str) -> Node {
        Node::new(id, id, NodeKind::Document, vec![])
    }

    #[test]
    fn test_view_drops_invalid_edges() {
        let nodes = vec![node("a"), node("b"), node("c")];
        let edges = vec![
            Edge::new("a", "b"),
            Edge::new("b", "a"),
            Edge::new("a", "a"),
            Edge::new("a", "ghost"),
            Edge::new("b", "c"),
        ];
        let view = GraphView::new(&nodes, &edges);

        assert_eq!(view.node_count(), 3);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.degree(0), 1);
        assert_eq!(view.degree(1), 2);
        assert!(view.are_adjacent(2, 1));
        assert!(!view.are_adjacent(0, 2));
        assert_eq!(view.endpoints().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_neighbors_and_lookup() {
        let nodes = vec![node("hub"), node("x"), node("y")];
        let edges = vec![Edge::new("hub", "x"), Edge::new("y", "hub")];
        let view = GraphView::new(&nodes, &edges);

        let mut neighbors = view.neighbors(0);
        neighbors.sort();
        assert_eq!(neighbors, vec![1, 2]);
        assert_eq!(view.index_of("y"), Some(2));
        assert_eq!(view.index_of("z"), None);
        assert_eq!(view.node(1).id, "x");
    }

    #[test]
    fn test_knowledge_graph_lookups() {
        let graph = KnowledgeGraph {
            nodes: vec![node("a"), node("b")],
            edges: vec![Edge::new("a", "b")],
        };

        assert!(graph.node("a").is_some());
        assert!(graph.edge_between("b", "a").is_some());
        assert!(graph.edge_between("a", "c").is_none());
        assert_eq!(graph.view().edge_count(), 1);
    }
}
