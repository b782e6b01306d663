//! Event sinks and the adaptors that compose them into chains.
//!
//! Every sink forwards to exactly one downstream sink, and the outermost caller owns the
//! terminal one. Sinks take `&self` so a single chain can be shared between producer
//! threads.

mod collect;
mod limit;
mod select;

use std::sync::Arc;

pub use self::{
    collect::{CollectSink, Collected, collect},
    limit::{LimitSink, with_limit},
    select::{SelectSink, with_select},
};
use crate::event::Event;

/// A consumer of events.
pub trait Sink: Send + Sync {
    /// Accepts one event. The event is owned by the sink from here on.
    fn deliver(&self, event: Event);
}

impl<S: Sink + ?Sized> Sink for &S {
    fn deliver(&self, event: Event) {
        (**self).deliver(event);
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn deliver(&self, event: Event) {
        (**self).deliver(event);
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn deliver(&self, event: Event) {
        (**self).deliver(event);
    }
}

/// Adapts a callback into a sink.
#[derive(Clone)]
pub struct FuncSink<F> {
    /// The callback.
    f: F,
}

impl<F> Sink for FuncSink<F>
where
    F: Fn(Event) + Send + Sync,
{
    fn deliver(&self, event: Event) {
        (self.f)(event);
    }
}

/// Creates a sink that calls `f` for every event.
pub fn sink_fn<F>(f: F) -> FuncSink<F>
where
    F: Fn(Event) + Send + Sync,
{
    FuncSink { f }
}

/// A sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Sink for Discard {
    fn deliver(&self, _event: Event) {}
}
