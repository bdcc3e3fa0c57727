//! The side-channel write capability dispatched calls emit results to.

use serde_json::Value;

/// One session's push-stream write handle plus its correlation state.
///
/// The dispatcher never touches the session map directly; the gateway looks
/// the session up and hands the dispatcher this capability. A sink can stop
/// accepting writes at any time (caller disconnect) — emission failures are
/// reported through the return value, never as errors to the synchronous
/// exchange, which has already been answered.
pub trait EventSink: Send + Sync {
    /// The session identifier, for diagnostics.
    fn session_id(&self) -> &str;

    /// Write one protocol message onto the push stream.
    ///
    /// Returns `false` when the stream is gone or its channel is full; the
    /// message is dropped, not buffered or retried.
    fn emit(&self, message: &Value) -> bool;

    /// Record a successful `initialize`. Idempotent.
    fn mark_initialized(&self);

    /// Whether `initialize` has completed on this session.
    ///
    /// Advisory only: no method is gated on this flag.
    fn is_initialized(&self) -> bool;
}
