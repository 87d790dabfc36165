use std::collections::{HashMap, HashSet};

use crate::state::identity::VisitedKey;

/// Per-URL record of elements already attempted in a session.
///
/// Append-only: keys are never removed, so each page's candidate pool only
/// shrinks. That is what bounds the exploration loop.
#[derive(Debug, Default, Clone)]
pub struct VisitedSetTracker {
    visited_by_url: HashMap<String, HashSet<VisitedKey>>,
}

impl VisitedSetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self, url: &str, key: &VisitedKey) -> bool {
        self.visited_by_url
            .get(url)
            .map_or(true, |keys| !keys.contains(key))
    }

    /// Returns `false` if the key was already recorded.
    pub fn mark_visited(&mut self, url: &str, key: VisitedKey) -> bool {
        self.visited_by_url
            .entry(url.to_string())
            .or_default()
            .insert(key)
    }

    pub fn visited_count(&self, url: &str) -> usize {
        self.visited_by_url.get(url).map_or(0, HashSet::len)
    }

    pub fn total_visited(&self) -> usize {
        self.visited_by_url.values().map(HashSet::len).sum()
    }
}
