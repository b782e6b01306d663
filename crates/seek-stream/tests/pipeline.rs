//! End-to-end behavior of composed sink chains.

#![allow(clippy::tests_outside_test_module)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use parking_lot::Mutex;
use seek_stream::{
    CollectSink, Event, File, FileMatch, LineMatch, Match, RepoMatch, Scope, SelectPath, Sink,
    Symbol, SymbolMatch, collect, sink_fn, with_limit, with_select,
};

fn file_a() -> File {
    File {
        repo: "github.com/x/y".to_string(),
        commit: "c0ffee".to_string(),
        path: "a.go".to_string(),
    }
}

fn file_match(lines: &[u32]) -> Match {
    Match::from(FileMatch {
        file: file_a(),
        line_matches: lines
            .iter()
            .map(|&line_number| LineMatch {
                line_number,
                ..LineMatch::default()
            })
            .collect(),
    })
}

fn symbol_match() -> Match {
    Match::from(SymbolMatch {
        file: file_a(),
        symbols: vec![Symbol {
            name: "S".to_string(),
            kind: "struct".to_string(),
            line: 3,
        }],
    })
}

/// An event whose matches add up to `count` result units.
fn units(count: u32) -> Event {
    let lines: Vec<u32> = (0..count).collect();
    Event::from_matches(vec![file_match(&lines)])
}

/// Records every event it receives.
#[derive(Default)]
struct Recorder {
    /// Events in arrival order.
    events: Mutex<Vec<Event>>,
}

impl Sink for Recorder {
    fn deliver(&self, event: Event) {
        self.events.lock().push(event);
    }
}

#[test]
fn limit_at_boundary() {
    let root = Scope::new();
    let recorder = Recorder::default();
    let (scope, sink, _release) = with_limit(&root, &recorder, 5);

    for n in [2, 2, 3] {
        sink.deliver(units(n));
    }

    let events = recorder.events.lock();
    assert_eq!(events.len(), 4);
    assert!(events[..3].iter().all(|e| !e.stats.is_limit_hit));
    assert!(events[3].stats.is_limit_hit);
    assert!(events[3].matches.is_empty());
    assert!(scope.is_cancelled());
}

#[test]
fn limit_not_reached() {
    let root = Scope::new();
    let recorder = Recorder::default();
    let (scope, sink, release) = with_limit(&root, &recorder, 10);

    sink.deliver(units(3));
    sink.deliver(units(4));

    let events = recorder.events.lock();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| !e.stats.is_limit_hit));
    assert!(!scope.is_cancelled());

    release.release();
    assert!(scope.is_cancelled());
}

#[test]
fn select_reemits_file_matches() {
    let recorder = Recorder::default();
    let sink = with_select(Some(&recorder), SelectPath::Identity);

    sink.deliver(Event::from_matches(vec![file_match(&[1, 2])]));
    sink.deliver(Event::from_matches(vec![file_match(&[2, 3])]));
    sink.deliver(Event::from_matches(vec![symbol_match()]));
    sink.deliver(Event::from_matches(vec![symbol_match()]));

    let events = recorder.events.lock();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].matches, vec![file_match(&[1, 2])]);
    assert_eq!(events[1].matches, vec![file_match(&[2, 3])]);
    assert_eq!(events[2].matches, vec![symbol_match()]);
    assert!(events[3].matches.is_empty());
}

#[test]
fn collect_preserves_delivery_order() {
    let (collected, result) = collect(|sink| -> Result<(), String> {
        for n in 1..=3 {
            sink.deliver(units(n));
        }
        Ok(())
    });

    assert!(result.is_ok());
    let counts: Vec<usize> = collected.matches.iter().map(Match::result_count).collect();
    assert_eq!(counts, vec![1, 2, 3]);
    assert!(!collected.stats.is_limit_hit);
}

#[test]
fn concurrent_producers_stop_after_limit() {
    const PRODUCERS: usize = 8;
    const LIMIT: usize = 100;

    let root = Scope::new();
    let delivered = AtomicUsize::new(0);
    let collector = CollectSink::new();
    let (scope, sink, release) = with_limit(&root, &collector, LIMIT);

    thread::scope(|s| {
        for p in 0..PRODUCERS {
            let scope = &scope;
            let sink = &sink;
            let delivered = &delivered;
            s.spawn(move || {
                for i in 0.. {
                    if scope.is_cancelled() {
                        break;
                    }
                    let m = Match::from(RepoMatch {
                        name: format!("p{p}-{i}"),
                        rev: String::new(),
                    });
                    sink.deliver(Event::from_matches(vec![m]));
                    delivered.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });
    release.release();
    drop(sink);

    let collected = collector.into_inner();
    let delivered = delivered.load(Ordering::Relaxed);

    assert!(scope.is_cancelled());
    assert!(collected.stats.is_limit_hit);
    assert!(delivered > LIMIT);
    // Each producer can have at most one event in flight when the scope is cancelled.
    assert!(delivered <= LIMIT + PRODUCERS);
    assert_eq!(collected.matches.len(), delivered);
}

#[test]
fn concurrent_select_emits_each_repo_once() {
    let recorder = Arc::new(Recorder::default());
    let sink = with_select(Some(Arc::clone(&recorder)), SelectPath::Repo);

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for i in 0..50 {
                    let m = Match::from(FileMatch {
                        file: File {
                            repo: format!("repo-{}", i % 10),
                            commit: String::new(),
                            path: format!("f{i}"),
                        },
                        line_matches: Vec::new(),
                    });
                    sink.deliver(Event::from_matches(vec![m]));
                }
            });
        }
    });

    let mut repos: Vec<String> = recorder
        .events
        .lock()
        .iter()
        .flat_map(|e| e.matches.iter().map(|m| m.repo().to_string()))
        .collect();
    repos.sort();
    let expected: Vec<String> = (0..10).map(|i| format!("repo-{i}")).collect();
    assert_eq!(repos, expected);
}

#[test]
fn closures_terminate_chains() {
    let count = AtomicUsize::new(0);
    let terminal = sink_fn(|e: Event| {
        count.fetch_add(e.matches.len(), Ordering::Relaxed);
    });
    let root = Scope::new();
    let (_scope, limited, _release) = with_limit(&root, &terminal, 2);
    let selected = with_select(Some(&limited), SelectPath::Repo);

    selected.deliver(Event::from_matches(vec![file_match(&[1]), symbol_match()]));
    selected.deliver(Event::from_matches(vec![file_match(&[7])]));

    assert_eq!(count.load(Ordering::Relaxed), 1);
    assert_eq!(limited.remaining(), 1);
}
