//! Edge types for the knowledge graph.
//!
//! Edges are undirected for analysis but remember which side the link was
//! written on, so `source` is always the document that did the linking.

use serde::{Deserialize, Serialize};

/// Lower bound for edge strength.
pub const MIN_STRENGTH: f64 = 0.3;

/// Upper bound for edge strength.
pub const MAX_STRENGTH: f64 = 1.0;

/// The type of relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Document A links to document B.
    #[default]
    Reference,

    /// Container A holds document B.
    Containment,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Reference => "reference",
            Self::Containment => "containment",
        };
        write!(f, "{}", s)
    }
}

/// An edge between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default = "default_strength")]
    pub strength: f64,
    /// True when both endpoints link to each other.
    #[serde(default)]
    pub bidirectional: bool,
}

fn default_strength() -> f64 {
    strength_for(0)
}

/// Edge strength for a pair of nodes sharing `shared_tags` tags.
pub fn strength_for(shared_tags: usize) -> f64 {
    (0.5 + 0.3 * shared_tags as f64).clamp(MIN_STRENGTH, MAX_STRENGTH)
}

impl Edge {
    /// Creates a one-way reference edge with base strength.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Reference,
            strength: strength_for(0),
            bidirectional: false,
        }
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets strength from the number of tags shared by the endpoints.
    pub fn with_shared_tags(mut self, shared_tags: usize) -> Self {
        self.strength = strength_for(shared_tags);
        self
    }

    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    /// Returns true if this edge touches the given node id.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// True when source and target are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_grows_with_shared_tags() {
        assert_eq!(strength_for(0), 0.5);
        assert!((strength_for(1) - 0.8).abs() < 1e-12);
        assert_eq!(strength_for(2), MAX_STRENGTH);
        assert_eq!(strength_for(10), MAX_STRENGTH);
    }

    #[test]
    fn test_edge_defaults_from_json() {
        let edge: Edge = serde_json::from_str(r#"{"source": "A", "target": "B"}"#).unwrap();
        assert_eq!(edge.kind, EdgeKind::Reference);
        assert_eq!(edge.strength, 0.5);
        assert!(!edge.bidirectional);
        assert!(edge.touches("A"));
        assert!(!edge.touches("C"));
    }
}
