//! Batch collection for callers that want every result at once.

use parking_lot::Mutex;

use super::Sink;
use crate::{event::Event, matches::Match, stats::Stats};

/// Everything delivered to a [`CollectSink`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Matches in delivery order.
    pub matches: Vec<Match>,
    /// Merge of all delivered stats.
    pub stats: Stats,
}

/// Buffers matches and merges stats.
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Accumulated results.
    inner: Mutex<Collected>,
}

impl CollectSink {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected results.
    pub fn into_inner(self) -> Collected {
        self.inner.into_inner()
    }
}

impl Sink for CollectSink {
    fn deliver(&self, event: Event) {
        let mut inner = self.inner.lock();
        inner.matches.extend(event.matches);
        inner.stats.merge(&event.stats);
    }
}

/// Runs `search` against a fresh [`CollectSink`] and returns what it delivered along with
/// the search's own result.
///
/// Results delivered before an error are kept.
pub fn collect<F, E>(search: F) -> (Collected, Result<(), E>)
where
    F: FnOnce(&CollectSink) -> Result<(), E>,
{
    let sink = CollectSink::new();
    let result = search(&sink);
    (sink.into_inner(), result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matches::RepoMatch,
        stats::{RepoStatus, Stats},
    };

    fn repo(name: &str) -> Match {
        Match::from(RepoMatch {
            name: name.to_string(),
            rev: String::new(),
        })
    }

    #[test]
    fn keeps_order_and_merges_stats() {
        let (collected, result) = collect(|sink| -> Result<(), String> {
            sink.deliver(Event::from_matches(vec![repo("a"), repo("b")]));

            let mut stats = Stats::default();
            stats.mark("a", RepoStatus::SEARCHED);
            sink.deliver(Event::from_stats(stats));

            sink.deliver(Event::from_matches(vec![repo("a")]));
            sink.deliver(Event::limit_hit());
            Ok(())
        });

        assert!(result.is_ok());
        let names: Vec<&str> = collected.matches.iter().map(Match::repo).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
        assert!(collected.stats.is_limit_hit);
        assert_eq!(collected.stats.status["a"], RepoStatus::SEARCHED);
    }

    #[test]
    fn surfaces_search_error_with_partial_results() {
        let (collected, result) = collect(|sink| {
            sink.deliver(Event::from_matches(vec![repo("a")]));
            Err("backend unavailable")
        });

        assert_eq!(result, Err("backend unavailable"));
        assert_eq!(collected.matches.len(), 1);
    }
}
