//! Synapse Core - The document and graph data model
//!
//! This crate defines the value types shared by every part of Synapse:
//! the documents a caller hands in, the nodes and edges the builder
//! produces, and the seam through which document content is turned into
//! link targets.
//!
//! # Example
//!
//! ```
//! use synapse_core::{LinkParser, WikiLinkParser};
//!
//! let parser = WikiLinkParser::new();
//! let links = parser.parse_links("See [[Graph Theory]] and [[Topology|topo]].");
//! assert_eq!(links, vec!["Graph Theory", "Topology"]);
//! ```

mod color;
mod document;
mod edge;
mod links;
mod node;

pub use color::{cluster_color, DEFAULT_COLOR};
pub use document::Document;
pub use edge::{strength_for, Edge, EdgeKind, MAX_STRENGTH, MIN_STRENGTH};
pub use links::{LinkParser, WikiLinkParser};
pub use node::{weight_for, Node, NodeKind, Position, MAX_WEIGHT, MIN_WEIGHT, UNCATEGORIZED};
