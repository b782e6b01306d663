//! Identity set for the selecting sink.

use fxhash::FxHashSet;

use crate::matches::MatchKey;

/// Remembers which match identities have been emitted.
#[derive(Debug, Default)]
pub struct Deduper {
    /// Keys seen so far.
    seen: FxHashSet<MatchKey>,
}

impl Deduper {
    /// Creates an empty deduper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` has been added.
    pub fn contains(&self, key: &MatchKey) -> bool {
        self.seen.contains(key)
    }

    /// Records `key`.
    pub fn add(&mut self, key: MatchKey) {
        self.seen.insert(key);
    }

    /// Number of distinct keys recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
