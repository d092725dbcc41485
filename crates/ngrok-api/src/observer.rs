//! Observability hook for sessions and collections
//!
//! The library never touches global logging state. Callers inject an
//! [`Observer`] when building a session; the default is [`NoopObserver`].
//! [`TracingObserver`] forwards everything to the `tracing` crate.

use std::sync::Arc;

/// Receives diagnostic events emitted by the client
pub trait Observer: Send + Sync {
    /// Routine progress information
    fn debug(&self, _message: &str) {}

    /// A failure that is about to be returned to the caller
    fn warn(&self, _message: &str) {}
}

/// Observer that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer backed by `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "ngrok_api", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "ngrok_api", "{}", message);
    }
}

/// Shared handle to an observer
pub type SharedObserver = Arc<dyn Observer>;

pub(crate) fn noop() -> SharedObserver {
    Arc::new(NoopObserver)
}
