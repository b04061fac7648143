//! Synapse Graph - Knowledge graph construction and analysis
//!
//! This crate turns a set of linked documents into a node/edge model and
//! runs the structural computations on it: force-directed layout, network
//! metrics and community detection.
//!
//! # Architecture
//!
//! ```text
//! Documents ──► GraphBuilder ──► KnowledgeGraph { nodes, edges }
//!                                      │
//!                                  GraphView (petgraph, undirected)
//!                                      │
//!              ┌──────────────┬────────┴───────┬───────────────┐
//!         ForceLayout   analyze_network  detect_communities  compute_centrality
//! ```
//!
//! Every computation takes nodes and edges by reference and returns owned
//! results, so callers can run them side by side on shared input.
//!
//! # Example
//!
//! ```
//! use synapse_core::{Document, NodeKind};
//! use synapse_graph::{analyze_network, GraphBuilder};
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_documents(vec![
//!     Document::new("a", "Alpha", NodeKind::Document).with_content("see [[Beta]]"),
//!     Document::new("b", "Beta", NodeKind::Document),
//! ]);
//! let graph = builder.build();
//!
//! let metrics = analyze_network(&graph.nodes, &graph.edges);
//! assert_eq!(metrics.edge_count, 1);
//! ```

mod analysis;
mod builder;
mod centrality;
mod community;
mod error;
mod graph;
mod layout;
mod name_index;

pub use analysis::{analyze_network, NetworkAnalysis};
pub use builder::GraphBuilder;
pub use centrality::{apply_centrality, compute_centrality};
pub use community::{detect_communities, Communities, CommunityGroup, MAX_ITERATIONS};
pub use error::GraphError;
pub use graph::{GraphView, KnowledgeGraph};
pub use layout::{
    ForceLayout, LayoutSettings, DEFAULT_DAMPING, DEFAULT_ITERATIONS, MAX_CANVAS_AREA,
};
