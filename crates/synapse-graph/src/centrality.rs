//! Degree centrality.
//!
//! A node's centrality is the share of all edges that touch it:
//! `(in + out) / max(1, total edges)`. Scores are normalized per node and
//! do not sum to one.

use crate::graph::GraphView;
use std::collections::BTreeMap;
use synapse_core::{Edge, Node};

/// Centrality scores for every node, keyed by node id.
pub fn compute_centrality(nodes: &[Node], edges: &[Edge]) -> BTreeMap<String, f64> {
    let view = GraphView::new(nodes, edges);
    let mut by_id = BTreeMap::new();
    for (index, score) in scores(&view).into_iter().enumerate() {
        // Edges resolve to the first node with an id; later copies are isolated.
        by_id.entry(view.node(index).id.clone()).or_insert(score);
    }
    by_id
}

/// Writes fresh centrality scores into `nodes`.
pub fn apply_centrality(nodes: &mut [Node], edges: &[Edge]) {
    let computed = {
        let view = GraphView::new(nodes, edges);
        scores(&view)
    };
    for (node, score) in nodes.iter_mut().zip(computed) {
        node.centrality = score;
    }
}

fn scores(view: &GraphView<'_>) -> Vec<f64> {
    let total = view.edge_count().max(1) as f64;
    (0..view.node_count())
        .map(|index| view.degree(index) as f64 / total)
        .collect()
}
