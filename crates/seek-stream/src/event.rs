//! The unit of flow through a sink chain.

use serde::{Deserialize, Serialize};

use crate::{matches::Match, stats::Stats};

/// A batch of matches plus a stats delta. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Matches in producer order.
    #[serde(default)]
    pub matches: Vec<Match>,
    /// Statistics to merge into the running total.
    #[serde(default)]
    pub stats: Stats,
}

impl Event {
    /// Creates an event with matches and empty stats.
    pub fn from_matches(matches: Vec<Match>) -> Self {
        Self {
            matches,
            stats: Stats::default(),
        }
    }

    /// Creates an event with stats and no matches.
    pub fn from_stats(stats: Stats) -> Self {
        Self {
            matches: Vec::new(),
            stats,
        }
    }

    /// The marker emitted when a limit is crossed.
    pub fn limit_hit() -> Self {
        Self::from_stats(Stats::limit_hit())
    }

    /// Total result units carried by the matches.
    pub fn result_count(&self) -> usize {
        self.matches.iter().map(Match::result_count).sum()
    }

    /// Returns true if the event carries no matches and no stats.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.stats.is_zero()
    }
}
