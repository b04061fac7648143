//! Network-level metrics.
//!
//! Density, average degree and average local clustering coefficient over
//! the undirected graph. Floating results are rounded (3 places for
//! density and clustering, 2 for average degree) so repeated runs compare
//! equal.

use crate::graph::GraphView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use synapse_core::{Edge, Node};
use tracing::debug;

/// Aggregate metrics for one graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalysis {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub avg_degree: f64,
    pub avg_clustering_coefficient: f64,
    pub degree_by_node_id: BTreeMap<String, usize>,
}

/// Computes network metrics for a node/edge set.
///
/// An empty graph is a valid input and yields all-zero metrics.
pub fn analyze_network(nodes: &[Node], edges: &[Edge]) -> NetworkAnalysis {
    let view = GraphView::new(nodes, edges);
    let node_count = view.node_count();
    let edge_count = view.edge_count();

    let degrees: Vec<usize> = (0..node_count).map(|i| view.degree(i)).collect();

    let density = if node_count <= 1 {
        0.0
    } else {
        let possible = node_count as f64 * (node_count as f64 - 1.0) / 2.0;
        edge_count as f64 / possible
    };

    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / node_count as f64
    };

    let coefficients: Vec<f64> = (0..node_count)
        .filter_map(|i| local_clustering(&view, i))
        .collect();
    let avg_clustering = if coefficients.is_empty() {
        0.0
    } else {
        coefficients.iter().sum::<f64>() / coefficients.len() as f64
    };

    debug!(
        "Analyzed network: {} nodes, {} edges, {} nodes with clustering",
        node_count,
        edge_count,
        coefficients.len()
    );

    let mut degree_by_node_id = BTreeMap::new();
    for (i, &degree) in degrees.iter().enumerate() {
        degree_by_node_id
            .entry(view.node(i).id.clone())
            .or_insert(degree);
    }

    NetworkAnalysis {
        node_count,
        edge_count,
        density: round_to(density, 3),
        avg_degree: round_to(avg_degree, 2),
        avg_clustering_coefficient: round_to(avg_clustering, 3),
        degree_by_node_id,
    }
}

/// Local clustering coefficient, or `None` for nodes with fewer than two
/// neighbors.
fn local_clustering(view: &GraphView<'_>, index: usize) -> Option<f64> {
    let neighbors = view.neighbors(index);
    let k = neighbors.len();
    if k < 2 {
        return None;
    }

    let mut links = 0usize;
    for (offset, &a) in neighbors.iter().enumerate() {
        for &b in &neighbors[offset + 1..] {
            if view.are_adjacent(a, b) {
                links += 1;
            }
        }
    }

    let possible = k * (k - 1) / 2;
    Some(links as f64 / possible as f64)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
