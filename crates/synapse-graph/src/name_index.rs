use std::collections::HashMap;

/// Resolves link target names to document positions.
///
/// When two documents share a name the first one registered wins, so
/// resolution does not depend on anything but input order.
#[derive(Debug, Default, Clone)]
pub struct NameIndex {
    by_name: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document. Returns false if its id was already taken.
    pub fn insert(&mut self, id: &str, name: &str, position: usize) -> bool {
        if self.by_id.contains_key(id) {
            return false;
        }
        self.by_id.insert(id.to_string(), position);
        self.by_name.entry(name.to_string()).or_insert(position);
        true
    }

    /// Resolves a link target name.
    pub fn resolve_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Resolves a document id.
    pub fn resolve_id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}
