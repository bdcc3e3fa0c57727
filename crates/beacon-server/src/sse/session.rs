//! Per-session push stream state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::response::sse::Event;
use beacon_rpc::EventSink;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::EVENT_MESSAGE;

/// One caller's open push stream plus its correlation state.
///
/// The registry is the sole owner; handlers hold a temporary `Arc` for the
/// duration of one dispatch. The stream handle (`tx`) is write-only and may
/// become invalid at any time — sends report failure, they never block a
/// dispatch.
pub struct SseSession {
    /// Unique session identifier (UUID v7).
    pub id: String,
    /// Send half of the session's push channel.
    tx: mpsc::Sender<Event>,
    /// Set true exactly once by a successful `initialize`. Advisory state,
    /// not an access gate: un-initialized sessions accept every call type.
    initialized: AtomicBool,
    /// Cancelled exactly once when the stream closes; stops the heartbeat.
    cancel: CancellationToken,
    /// When this stream was opened.
    pub connected_at: Instant,
    /// Count of messages dropped due to a full or closed channel.
    dropped_messages: AtomicU64,
}

impl SseSession {
    /// Create session state around the given push channel.
    pub fn new(id: String, tx: mpsc::Sender<Event>) -> Self {
        Self {
            id,
            tx,
            initialized: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            connected_at: Instant::now(),
            dropped_messages: AtomicU64::new(0),
        }
    }

    /// Clone of the teardown token (heartbeat and stream watchers).
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Signal teardown. Idempotent.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Whether teardown has been signalled.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the receive half of the push channel is gone.
    pub fn is_stream_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Enqueue one event for the push stream.
    ///
    /// Returns `false` if the channel is full or closed, and increments the
    /// dropped counter. Events for the same session are observed in the
    /// order enqueued.
    pub fn send_event(&self, event: Event) -> bool {
        if self.tx.try_send(event).is_ok() {
            true
        } else {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Total events dropped for this session.
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }

    /// Stream age.
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

impl EventSink for SseSession {
    fn session_id(&self) -> &str {
        &self.id
    }

    fn emit(&self, message: &Value) -> bool {
        match Event::default().event(EVENT_MESSAGE).json_data(message) {
            Ok(event) => self.send_event(event),
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "failed to encode push message");
                false
            }
        }
    }

    fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Relaxed);
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_session() -> (SseSession, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(8);
        (SseSession::new("sess_1".into(), tx), rx)
    }

    #[test]
    fn new_session_state() {
        let (session, _rx) = make_session();
        assert_eq!(session.id, "sess_1");
        assert!(!session.is_initialized());
        assert!(!session.is_closed());
        assert_eq!(session.drop_count(), 0);
    }

    #[tokio::test]
    async fn send_event_delivers_in_order() {
        let (session, mut rx) = make_session();
        assert!(session.send_event(Event::default().data("first")));
        assert!(session.send_event(Event::default().data("second")));
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn send_to_closed_channel_fails_and_counts() {
        let (tx, rx) = mpsc::channel(8);
        let session = SseSession::new("sess_2".into(), tx);
        drop(rx);
        assert!(session.is_stream_closed());
        assert!(!session.send_event(Event::default().data("x")));
        assert_eq!(session.drop_count(), 1);
    }

    #[tokio::test]
    async fn send_to_full_channel_fails() {
        let (tx, _rx) = mpsc::channel(1);
        let session = SseSession::new("sess_3".into(), tx);
        assert!(session.send_event(Event::default().data("fill")));
        assert!(!session.send_event(Event::default().data("overflow")));
        assert_eq!(session.drop_count(), 1);
        // Full is not the same as gone.
        assert!(!session.is_stream_closed());
    }

    #[tokio::test]
    async fn emit_encodes_json_message() {
        let (session, mut rx) = make_session();
        assert!(session.emit(&json!({"jsonrpc": "2.0", "id": 1, "result": {}})));
        assert!(rx.recv().await.is_some());
    }

    #[test]
    fn mark_initialized_is_sticky() {
        let (session, _rx) = make_session();
        session.mark_initialized();
        session.mark_initialized();
        assert!(session.is_initialized());
    }

    #[test]
    fn close_is_idempotent() {
        let (session, _rx) = make_session();
        let token = session.cancel_token();
        session.close();
        session.close();
        assert!(session.is_closed());
        assert!(token.is_cancelled());
    }

    #[test]
    fn age_increases() {
        let (session, _rx) = make_session();
        let a = session.age();
        std::thread::sleep(Duration::from_millis(5));
        assert!(session.age() > a);
    }
}
