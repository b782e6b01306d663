//! Selector projection with deduplication.

use std::mem;

use parking_lot::Mutex;
use tracing::trace;

use super::Sink;
use crate::{dedup::Deduper, event::Event, selector::SelectPath};

/// Projects every match through a [`SelectPath`] and drops repeated identities.
///
/// File matches are forwarded even when their identity was already seen, since a later
/// event can carry different line matches for the same file.
#[derive(Debug)]
pub struct SelectSink<S> {
    /// Downstream sink; `None` drains events.
    parent: Option<S>,
    /// Projection applied to each match.
    selector: SelectPath,
    /// Identities emitted so far.
    dedup: Mutex<Deduper>,
}

impl<S: Sink> Sink for SelectSink<S> {
    fn deliver(&self, mut event: Event) {
        let matches = mem::take(&mut event.matches);
        let mut selected = Vec::with_capacity(matches.len());

        {
            let mut dedup = self.dedup.lock();
            for m in matches {
                let Some(projected) = m.select(&self.selector) else {
                    trace!(selector = %self.selector, "match has no projection");
                    continue;
                };

                let key = projected.key();
                if dedup.contains(&key) && !projected.is_file() {
                    trace!(repo = projected.repo(), "dropping duplicate match");
                    continue;
                }
                dedup.add(key);
                selected.push(projected);
            }
        }

        event.matches = selected;
        if let Some(parent) = &self.parent {
            parent.deliver(event);
        }
    }
}

/// Wraps `parent` in a sink that applies `selector` to every match.
///
/// With no parent, the returned sink still deduplicates but forwards nothing.
pub fn with_select<S: Sink>(parent: Option<S>, selector: SelectPath) -> SelectSink<S> {
    SelectSink {
        parent,
        selector,
        dedup: Mutex::new(Deduper::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matches::{File, FileMatch, Match, RepoMatch},
        sink::{Discard, sink_fn},
    };

    fn file_in(repo: &str, path: &str) -> Match {
        Match::from(FileMatch {
            file: File {
                repo: repo.to_string(),
                commit: String::new(),
                path: path.to_string(),
            },
            line_matches: Vec::new(),
        })
    }

    #[test]
    fn select_repo_dedups_across_events() {
        let seen = Mutex::new(Vec::new());
        let sink = with_select(
            Some(sink_fn(|e: Event| seen.lock().push(e.matches))),
            SelectPath::Repo,
        );

        sink.deliver(Event::from_matches(vec![file_in("a", "x"), file_in("a", "y")]));
        sink.deliver(Event::from_matches(vec![file_in("b", "x"), file_in("a", "z")]));

        let names: Vec<Vec<String>> = seen
            .lock()
            .iter()
            .map(|ms| ms.iter().map(|m| m.repo().to_string()).collect())
            .collect();
        assert_eq!(names, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn unprojectable_matches_are_dropped() {
        let seen = Mutex::new(Vec::new());
        let sink = with_select(
            Some(sink_fn(|e: Event| seen.lock().push(e))),
            SelectPath::Commit,
        );

        sink.deliver(Event::from_matches(vec![
            file_in("a", "x"),
            RepoMatch::default().into(),
        ]));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].matches.is_empty());
    }

    #[test]
    fn stats_pass_through() {
        let seen = Mutex::new(Vec::new());
        let sink = with_select(
            Some(sink_fn(|e: Event| seen.lock().push(e))),
            SelectPath::Repo,
        );

        sink.deliver(Event::limit_hit());
        assert!(seen.lock()[0].stats.is_limit_hit);
    }

    #[test]
    fn no_parent_is_a_drain() {
        let sink = with_select(None::<Discard>, SelectPath::Identity);
        sink.deliver(Event::from_matches(vec![file_in("a", "x")]));
        assert_eq!(sink.dedup.lock().len(), 1);
    }
}
