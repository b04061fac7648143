//! Graph nodes.
//!
//! A node is the graph-side projection of a [`Document`]. Everything on it
//! except `position` is fixed once the builder has produced it; the layout
//! solver works on its own copy of the positions.

use crate::color::{cluster_color, DEFAULT_COLOR};
use crate::document::Document;
use serde::{Deserialize, Serialize};

/// Cluster label for nodes without tags.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Smallest visual weight a node can have.
pub const MIN_WEIGHT: u32 = 12;

/// Largest visual weight a node can have.
pub const MAX_WEIGHT: u32 = 30;

/// The kind of entity a node (or document) represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A note with content that may link to other documents.
    #[default]
    Document,
    /// A folder. Its content is never parsed for links.
    Container,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Document => "document",
            Self::Container => "container",
        };
        write!(f, "{}", s)
    }
}

/// A point on the layout canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A vertex in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_cluster")]
    pub cluster: String,
    /// Number of resolved outbound links of the source document.
    #[serde(default)]
    pub connection_count: usize,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_color")]
    pub color: String,
    /// Share of all edges touching this node, in [0, 1].
    #[serde(default)]
    pub centrality: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

fn default_cluster() -> String {
    UNCATEGORIZED.to_string()
}

fn default_weight() -> u32 {
    weight_for(0)
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Visual weight for a node with the given number of outbound links.
pub fn weight_for(connection_count: usize) -> u32 {
    let raw = 15usize.saturating_add(connection_count.saturating_mul(2));
    raw.clamp(MIN_WEIGHT as usize, MAX_WEIGHT as usize) as u32
}

impl Node {
    /// Creates a node with derived cluster, color and weight.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
        tags: Vec<String>,
    ) -> Self {
        let cluster = tags
            .first()
            .cloned()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let color = cluster_color(&cluster).to_string();

        Self {
            id: id.into(),
            name: name.into(),
            kind,
            tags,
            cluster,
            connection_count: 0,
            weight: weight_for(0),
            color,
            centrality: 0.0,
            position: None,
        }
    }

    /// Projects a document into a node.
    pub fn from_document(doc: &Document, connection_count: usize) -> Self {
        Self::new(doc.id.clone(), doc.name.clone(), doc.kind, doc.tags.clone())
            .with_connection_count(connection_count)
    }

    /// Sets the link count and recomputes the weight from it.
    pub fn with_connection_count(mut self, connection_count: usize) -> Self {
        self.connection_count = connection_count;
        self.weight = weight_for(connection_count);
        self
    }

    /// Builder-style setter for an initial position.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    /// Number of tags this node shares with another.
    pub fn shared_tag_count(&self, other: &Node) -> usize {
        let mut seen = std::collections::HashSet::new();
        self.tags
            .iter()
            .filter(|tag| seen.insert(tag.as_str()) && other.tags.contains(tag))
            .count()
    }
}
