//! Request handlers for protocol operations.
//!
//! Each handler implements one operation. Handlers take owned payloads, so
//! whatever they compute on is private to the request.

use crate::error::EngineError;
use crate::protocol::{CentralityResult, GraphPayload, LayoutPayload, LayoutResult};
use std::collections::HashSet;
use synapse_core::Node;
use synapse_graph::{
    analyze_network, apply_centrality, compute_centrality, detect_communities, Communities,
    ForceLayout, NetworkAnalysis,
};
use tracing::debug;

/// Handles `CALCULATE_LAYOUT`.
pub fn handle_layout(payload: LayoutPayload) -> Result<LayoutResult, EngineError> {
    let layout = ForceLayout::new(payload.settings)?;
    ensure_unique_ids(&payload.nodes)?;
    debug!(
        "Layout request: {} nodes, {} iterations",
        payload.nodes.len(),
        layout.settings().iterations
    );

    Ok(LayoutResult {
        nodes: layout.run(&payload.nodes, &payload.edges),
    })
}

/// Handles `ANALYZE_NETWORK`.
pub fn handle_analyze(payload: GraphPayload) -> Result<NetworkAnalysis, EngineError> {
    ensure_unique_ids(&payload.nodes)?;
    debug!("Analyze request: {} nodes", payload.nodes.len());
    Ok(analyze_network(&payload.nodes, &payload.edges))
}

/// Handles `FIND_COMMUNITIES`.
pub fn handle_communities(payload: GraphPayload) -> Result<Communities, EngineError> {
    ensure_unique_ids(&payload.nodes)?;
    debug!("Community request: {} nodes", payload.nodes.len());
    Ok(detect_communities(&payload.nodes, &payload.edges))
}

/// Handles `CALCULATE_CENTRALITY`.
pub fn handle_centrality(payload: GraphPayload) -> Result<CentralityResult, EngineError> {
    let GraphPayload { mut nodes, edges } = payload;
    ensure_unique_ids(&nodes)?;
    debug!("Centrality request: {} nodes", nodes.len());

    apply_centrality(&mut nodes, &edges);
    Ok(CentralityResult {
        centrality_by_node_id: compute_centrality(&nodes, &edges),
        nodes,
    })
}

/// Node ids in a request must be unique.
fn ensure_unique_ids(nodes: &[Node]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    match nodes.iter().find(|node| !seen.insert(node.id.as_str())) {
        Some(node) => Err(EngineError::InvalidPayload(format!(
            "duplicate node id: {}",
            node.id
        ))),
        None => Ok(()),
    }
}
