//! seek: query predicate expansion and streaming result filtering.
//!
//! The binary wraps the `seek-query` and `seek-stream` libraries. `seek expand` shows how
//! field predicates such as `repo:contains(file:README)` rewrite into sub-queries, and
//! `seek filter` pushes a stream of match events through the limit and select sinks.

#![warn(missing_docs)]

pub mod cli;
