//! Input documents.
//!
//! A document is the caller's view of a note or folder. It carries the raw
//! content the link parser reads, plus the tag list that decides which
//! cluster its node ends up in. Containers share [`NodeKind`] with the
//! nodes built from them.

use crate::node::NodeKind;
use serde::{Deserialize, Serialize};

/// A single input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
    /// Id of the enclosing container, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Document {
    /// Creates a document with no tags, content or parent.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            tags: Vec::new(),
            content: String::new(),
            parent_id: None,
        }
    }

    /// Builder-style setter for tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder-style setter for the parent container.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Returns true if this document's content should be scanned for links.
    pub fn has_links(&self) -> bool {
        self.kind == NodeKind::Document
    }
}
