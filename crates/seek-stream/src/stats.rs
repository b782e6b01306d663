//! Streaming progress counters.

use std::{
    collections::BTreeMap,
    ops::{BitOr, BitOrAssign},
};

use serde::{Deserialize, Serialize};

/// Per-repository status bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoStatus(u8);

impl RepoStatus {
    /// No status.
    pub const NONE: Self = Self(0);
    /// The repository was searched.
    pub const SEARCHED: Self = Self(1);
    /// The repository was served from an index.
    pub const INDEXED: Self = Self(1 << 1);
    /// The repository is still being cloned.
    pub const CLONING: Self = Self(1 << 2);
    /// The repository does not exist.
    pub const MISSING: Self = Self(1 << 3);
    /// The search of this repository timed out.
    pub const TIMED_OUT: Self = Self(1 << 4);
    /// The search of this repository stopped at a limit.
    pub const LIMIT_HIT: Self = Self(1 << 5);

    /// Returns true if every bit in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for RepoStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RepoStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Aggregated streaming statistics.
///
/// [`merge`](Self::merge) is a union, so merging is commutative and idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// A result limit was reached somewhere upstream.
    #[serde(default)]
    pub is_limit_hit: bool,
    /// Status bits by repository name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub status: BTreeMap<String, RepoStatus>,
}

impl Stats {
    /// Stats carrying only the limit-hit flag.
    pub fn limit_hit() -> Self {
        Self {
            is_limit_hit: true,
            ..Self::default()
        }
    }

    /// Records `status` for `repo`, keeping previously set bits.
    pub fn mark(&mut self, repo: impl Into<String>, status: RepoStatus) {
        *self.status.entry(repo.into()).or_default() |= status;
    }

    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.is_limit_hit |= other.is_limit_hit;
        for (repo, status) in &other.status {
            *self.status.entry(repo.clone()).or_default() |= *status;
        }
    }

    /// Returns true if nothing has been recorded.
    pub fn is_zero(&self) -> bool {
        !self.is_limit_hit && self.status.is_empty()
    }

    /// Repositories with every bit of `status` set.
    pub fn repos_with(&self, status: RepoStatus) -> impl Iterator<Item = &str> {
        self.status
            .iter()
            .filter(move |(_, s)| s.contains(status))
            .map(|(repo, _)| repo.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(repo: &str, status: RepoStatus, limit: bool) -> Stats {
        let mut stats = Stats {
            is_limit_hit: limit,
            ..Stats::default()
        };
        stats.mark(repo, status);
        stats
    }

    #[test]
    fn merge_is_commutative() {
        let a = sample("a", RepoStatus::SEARCHED, false);
        let b = sample("a", RepoStatus::TIMED_OUT, true);

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(ab, ba);
        assert!(ab.is_limit_hit);
        assert_eq!(ab.status["a"], RepoStatus::SEARCHED | RepoStatus::TIMED_OUT);
    }

    #[test]
    fn merge_is_idempotent() {
        let a = sample("a", RepoStatus::CLONING, true);
        let mut twice = a.clone();
        twice.merge(&a);
        assert_eq!(twice, a);
    }

    #[test]
    fn limit_hit_never_regresses() {
        let mut stats = Stats::limit_hit();
        stats.merge(&Stats::default());
        assert!(stats.is_limit_hit);
    }

    #[test]
    fn repos_with_filters_by_bits() {
        let mut stats = Stats::default();
        stats.mark("a", RepoStatus::SEARCHED | RepoStatus::INDEXED);
        stats.mark("b", RepoStatus::MISSING);
        stats.mark("c", RepoStatus::SEARCHED);

        let searched: Vec<_> = stats.repos_with(RepoStatus::SEARCHED).collect();
        assert_eq!(searched, vec!["a", "c"]);
        assert!(!stats.is_zero());
        assert!(Stats::default().is_zero());
    }
}
