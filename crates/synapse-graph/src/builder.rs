//! Graph builder for constructing the knowledge graph from documents.
//!
//! The builder resolves each document's links into edges in two passes:
//! 1. Index every document by name and id, parse links, create nodes
//! 2. Turn resolved links (and parent relationships) into deduplicated edges

use crate::centrality::apply_centrality;
use crate::graph::KnowledgeGraph;
use crate::name_index::NameIndex;
use std::collections::HashSet;
use synapse_core::{Document, Edge, EdgeKind, LinkParser, Node, WikiLinkParser};
use tracing::{debug, info, warn};

/// Builds a [`KnowledgeGraph`] from documents.
///
/// Dangling links and self-links are content noise, not errors: they are
/// dropped without affecting the rest of the graph.
pub struct GraphBuilder<P = WikiLinkParser> {
    parser: P,
    documents: Vec<Document>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a builder that reads `[[wiki links]]`.
    pub fn new() -> Self {
        Self::with_parser(WikiLinkParser::new())
    }
}

impl<P: LinkParser> GraphBuilder<P> {
    /// Creates a builder with a custom link parser.
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            documents: Vec::new(),
        }
    }

    /// Queues documents for the next build.
    pub fn add_documents(&mut self, documents: impl IntoIterator<Item = Document>) {
        self.documents.extend(documents);
    }

    /// Finishes building and returns the graph.
    pub fn build(self) -> KnowledgeGraph {
        build_graph(&self.parser, &self.documents)
    }
}

fn build_graph<P: LinkParser>(parser: &P, documents: &[Document]) -> KnowledgeGraph {
    let mut index = NameIndex::new();
    let mut kept: Vec<&Document> = Vec::with_capacity(documents.len());

    for doc in documents {
        if index.insert(&doc.id, &doc.name, kept.len()) {
            kept.push(doc);
        } else {
            warn!("Skipping document with duplicate id: {}", doc.id);
        }
    }

    // Pass 1: resolve links, create nodes
    let links: Vec<Vec<usize>> = kept
        .iter()
        .enumerate()
        .map(|(position, doc)| {
            if !doc.has_links() {
                return Vec::new();
            }
            parser
                .parse_links(&doc.content)
                .iter()
                .filter_map(|target| index.resolve_name(target))
                .filter(|&target| target != position)
                .collect()
        })
        .collect();

    let mut nodes: Vec<Node> = kept
        .iter()
        .zip(&links)
        .map(|(doc, targets)| Node::from_document(doc, targets.len()))
        .collect();

    // Pass 2: edges, at most one per unordered pair
    let link_sets: Vec<HashSet<usize>> = links
        .iter()
        .map(|targets| targets.iter().copied().collect())
        .collect();
    let mut pairs: HashSet<(usize, usize)> = HashSet::new();
    let mut edges = Vec::new();

    for (source, targets) in links.iter().enumerate() {
        for &target in targets {
            if !pairs.insert(pair_key(source, target)) {
                continue;
            }
            let shared = nodes[source].shared_tag_count(&nodes[target]);
            edges.push(
                Edge::new(nodes[source].id.clone(), nodes[target].id.clone())
                    .with_shared_tags(shared)
                    .with_bidirectional(link_sets[target].contains(&source)),
            );
        }
    }

    for (child, doc) in kept.iter().enumerate() {
        let Some(parent) = doc.parent_id.as_deref().and_then(|id| index.resolve_id(id)) else {
            continue;
        };
        if parent == child || !pairs.insert(pair_key(parent, child)) {
            continue;
        }
        let shared = nodes[parent].shared_tag_count(&nodes[child]);
        edges.push(
            Edge::new(nodes[parent].id.clone(), nodes[child].id.clone())
                .with_kind(EdgeKind::Containment)
                .with_shared_tags(shared),
        );
    }

    apply_centrality(&mut nodes, &edges);

    debug!(
        "Resolved {} links across {} documents",
        links.iter().map(Vec::len).sum::<usize>(),
        kept.len()
    );
    info!(
        "Built knowledge graph ({} nodes, {} edges)",
        nodes.len(),
        edges.len()
    );

    KnowledgeGraph { nodes, edges }
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::NodeKind;

    fn doc(id: &str, name: &str, tags: &[&str], content: &str) -> Document {
        Document::new(id, name, NodeKind::Document)
            .with_tags(tags.iter().copied())
            .with_content(content)
    }

    fn build(docs: Vec<Document>) -> KnowledgeGraph {
        let mut builder = GraphBuilder::new();
        builder.add_documents(docs);
        builder.build()
    }

    #[test]
    fn test_empty_input_gives_empty_graph() {
        let graph = build(vec![]);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_builder_resolves_edges() {
        let graph = build(vec![
            doc("1", "Caller", &["math"], "uses [[Callee]]"),
            doc("2", "Callee", &["math", "cs"], ""),
        ]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let edge = &graph.edges[0];
        assert_eq!(edge.source, "1");
        assert_eq!(edge.target, "2");
        assert_eq!(edge.kind, EdgeKind::Reference);
        assert!(!edge.bidirectional);
        assert!((edge.strength - 0.8).abs() < 1e-12);

        let caller = graph.node("1").unwrap();
        assert_eq!(caller.connection_count, 1);
        assert_eq!(caller.weight, 17);
        assert_eq!(caller.cluster, "math");
        assert_eq!(caller.centrality, 1.0);
    }

    #[test]
    fn test_mutual_links_collapse_into_bidirectional_edge() {
        let graph = build(vec![
            doc("a", "A", &[], "[[B]] and again [[B]]"),
            doc("b", "B", &[], "back to [[A]]"),
        ]);

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edges[0].bidirectional);
        // Counted before deduplication.
        assert_eq!(graph.node("a").unwrap().connection_count, 2);
        assert_eq!(graph.node("b").unwrap().connection_count, 1);
    }

    #[test]
    fn test_self_and_dangling_links_dropped() {
        let graph = build(vec![
            doc("a", "A", &[], "[[A]] [[Nowhere]] [[B]]"),
            doc("b", "B", &[], ""),
        ]);

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edges.iter().all(|e| !e.is_self_loop()));
        assert_eq!(graph.node("a").unwrap().connection_count, 1);

        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &graph.edges {
            assert!(ids.contains(edge.source.as_str()));
            assert!(ids.contains(edge.target.as_str()));
        }
    }

    #[test]
    fn test_containment_edges() {
        let folder = Document::new("f", "Folder", NodeKind::Container)
            .with_tags(["math"])
            .with_content("[[Note]] is ignored in containers");
        let note = doc("n", "Note", &["math"], "").with_parent("f");
        let orphan = doc("o", "Orphan", &[], "").with_parent("missing");

        let graph = build(vec![folder, note, orphan]);

        assert_eq!(graph.edge_count(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.kind, EdgeKind::Containment);
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("f", "n"));
        assert!(!edge.bidirectional);
        assert_eq!(graph.node("f").unwrap().connection_count, 0);
        assert_eq!(graph.node("f").unwrap().kind, NodeKind::Container);
    }

    #[test]
    fn test_containment_skips_linked_pair() {
        let folder = Document::new("f", "Folder", NodeKind::Container);
        let note = doc("n", "Note", &[], "[[Folder]]").with_parent("f");

        let graph = build(vec![folder, note]);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].kind, EdgeKind::Reference);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let graph = build(vec![doc("a", "First", &[], ""), doc("a", "Second", &[], "")]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes[0].name, "First");
    }

    #[test]
    fn test_custom_parser() {
        let parser = |content: &str| -> Vec<String> {
            content.split(',').map(|s| s.trim().to_string()).collect()
        };
        let mut builder = GraphBuilder::with_parser(parser);
        builder.add_documents(vec![
            doc("a", "A", &[], "B, C"),
            doc("b", "B", &[], ""),
            doc("c", "C", &[], ""),
        ]);
        let graph = builder.build();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node("a").unwrap().centrality, 1.0);
        assert_eq!(graph.node("b").unwrap().centrality, 0.5);
    }
}
