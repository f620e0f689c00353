//! The monotonic session cache.

use std::collections::BTreeMap;

use styleframe_core::GeneratorId;
use styleframe_core::tree::ContainerId;

/// `(generator, token) → emitted containers` for one build session.
///
/// Entries are only ever added. The cache is cleared only when the owning
/// compiler is reset for a cold rebuild.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: BTreeMap<(GeneratorId, String), Vec<ContainerId>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `(generator, token)` has been committed.
    pub fn contains(&self, generator: GeneratorId, token: &str) -> bool {
        self.entries.contains_key(&(generator, token.to_string()))
    }

    /// The containers committed for `(generator, token)`.
    pub fn get(&self, generator: GeneratorId, token: &str) -> Option<&[ContainerId]> {
        self.entries
            .get(&(generator, token.to_string()))
            .map(Vec::as_slice)
    }

    /// Record a commit. An existing entry is never replaced; returns
    /// whether the entry is new.
    pub(crate) fn insert(&mut self, generator: GeneratorId, token: &str, containers: Vec<ContainerId>) -> bool {
        let key = (generator, token.to_string());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, containers);
        true
    }

    /// Committed tokens, sorted and de-duplicated across generators.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.entries.keys().map(|(_, t)| t.as_str()).collect();
        tokens.sort_unstable();
        tokens.dedup();
        tokens
    }

    /// Iterate entries in `(generator, token)` order.
    pub fn iter(&self) -> impl Iterator<Item = (GeneratorId, &str, &[ContainerId])> {
        self.entries
            .iter()
            .map(|((id, token), containers)| (*id, token.as_str(), containers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
