//! Streaming result pipeline for seek.
//!
//! Producers push [`Event`]s into a chain of [`Sink`]s that ends at a single consumer.
//! The adaptors in this crate build such chains:
//!
//! - [`with_limit`] counts result units and cancels a [`Scope`] once a limit is exceeded
//! - [`with_select`] projects matches through a [`SelectPath`] and drops duplicates
//! - [`collect`] gathers everything for callers that do not stream
//! - [`sink_fn`] turns a closure into a sink
//!
//! # Example
//!
//! ```
//! use seek_stream::{
//!     Event, Match, RepoMatch, Scope, SelectPath, Sink, collect, with_limit, with_select,
//! };
//!
//! let root = Scope::new();
//! let (collected, result) = collect(|sink| {
//!     let (scope, limited, release) = with_limit(&root, sink, 1);
//!     let selected = with_select(Some(&limited), SelectPath::Repo);
//!
//!     for name in ["a", "b", "c"] {
//!         if scope.is_cancelled() {
//!             break;
//!         }
//!         let m = Match::from(RepoMatch { name: name.into(), rev: String::new() });
//!         selected.deliver(Event::from_matches(vec![m]));
//!     }
//!     release.release();
//!     Ok::<_, std::convert::Infallible>(())
//! });
//!
//! assert!(result.is_ok());
//! assert_eq!(collected.matches.len(), 2);
//! assert!(collected.stats.is_limit_hit);
//! ```

#![warn(missing_docs)]

mod dedup;
mod event;
mod matches;
mod scope;
mod selector;
mod sink;
mod stats;

pub use dedup::Deduper;
pub use event::Event;
pub use matches::{
    CommitMatch, File, FileMatch, LineMatch, Match, MatchKey, RepoMatch, Symbol, SymbolMatch,
};
pub use scope::{Release, Scope};
pub use selector::{SelectError, SelectPath};
pub use sink::{
    CollectSink, Collected, Discard, FuncSink, LimitSink, SelectSink, Sink, collect, sink_fn,
    with_limit, with_select,
};
pub use stats::{RepoStatus, Stats};
