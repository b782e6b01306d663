//! Cancellation scopes.
//!
//! Scopes form a tree: cancelling a scope cancels every scope derived from it with
//! [`CancellationToken::child_token`], never the other way round. Producers poll
//! [`is_cancelled`](CancellationToken::is_cancelled) or await
//! [`cancelled`](CancellationToken::cancelled) and stop issuing new events.

use tokio_util::sync::CancellationToken;

/// A node in the cancellation tree.
pub type Scope = CancellationToken;

/// Cancels a child scope when released or dropped.
#[derive(Debug)]
#[must_use = "dropping a Release cancels its scope immediately"]
pub struct Release {
    /// The scope to cancel.
    scope: Scope,
}

impl Release {
    /// Wraps `scope`.
    pub const fn new(scope: Scope) -> Self {
        Self { scope }
    }

    /// Cancels the scope.
    pub fn release(self) {
        self.scope.cancel();
    }
}

impl Drop for Release {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
