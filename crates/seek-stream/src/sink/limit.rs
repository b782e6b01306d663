//! Result-count limiting with cooperative cancellation.

use std::sync::atomic::{AtomicI64, Ordering};

use tracing::debug;

use super::Sink;
use crate::{
    event::Event,
    scope::{Release, Scope},
};

/// Forwards every event and signals once the configured number of result units is
/// exceeded.
///
/// When an event pushes the remaining budget below zero the sink emits
/// [`Event::limit_hit`] downstream and cancels its scope. Events that arrive afterwards
/// are still forwarded.
#[derive(Debug)]
pub struct LimitSink<S> {
    /// Downstream sink.
    parent: S,
    /// Remaining result units; goes negative once the limit is exceeded.
    remaining: AtomicI64,
    /// Scope cancelled when the limit is exceeded.
    scope: Scope,
}

impl<S> LimitSink<S> {
    /// Remaining result units. Negative once the limit has been exceeded.
    pub fn remaining(&self) -> i64 {
        self.remaining.load(Ordering::Acquire)
    }
}

impl<S: Sink> Sink for LimitSink<S> {
    fn deliver(&self, event: Event) {
        let count = event.result_count();
        self.parent.deliver(event);

        if count == 0 {
            return;
        }

        let count = i64::try_from(count).unwrap_or(i64::MAX);
        let old = self.remaining.fetch_sub(count, Ordering::AcqRel);
        let new = old.saturating_sub(count);

        if old >= 0 && new < 0 {
            debug!(remaining = new, "result limit exceeded, cancelling scope");
            self.parent.deliver(Event::limit_hit());
            self.scope.cancel();
        }
    }
}

/// Wraps `parent` in a sink that allows `limit` result units.
///
/// Returns a child of `parent_scope` that is cancelled when the limit is exceeded, the
/// sink itself, and a [`Release`] that cancels the child scope when the search is done.
pub fn with_limit<S: Sink>(
    parent_scope: &Scope,
    parent: S,
    limit: usize,
) -> (Scope, LimitSink<S>, Release) {
    let scope = parent_scope.child_token();
    let sink = LimitSink {
        parent,
        remaining: AtomicI64::new(i64::try_from(limit).unwrap_or(i64::MAX)),
        scope: scope.clone(),
    };
    let release = Release::new(scope.clone());
    (scope, sink, release)
}
