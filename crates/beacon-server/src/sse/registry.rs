//! Stream registry — the set of currently open push streams.

use std::collections::HashMap;
use std::sync::Arc;

use axum::response::sse::Event;
use beacon_rpc::EventSink;
use metrics::{counter, gauge, histogram};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::session::SseSession;

/// Holds every open push stream, keyed by session id.
///
/// The sole owner of session state. All operations are atomic with respect
/// to each other; handlers for different sessions run fully concurrently.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SseSession>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new stream: assigns a fresh session id and stores the
    /// mapping.
    pub fn open(&self, tx: mpsc::Sender<Event>) -> Arc<SseSession> {
        let id = Uuid::now_v7().to_string();
        let session = Arc::new(SseSession::new(id.clone(), tx));
        let _ = self.sessions.write().insert(id.clone(), session.clone());
        counter!("sse_connections_total").increment(1);
        gauge!("sse_connections_active").increment(1.0);
        debug!(session_id = id, "session opened");
        session
    }

    /// Resolve a session id.
    pub fn lookup(&self, session_id: &str) -> Option<Arc<SseSession>> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Remove a session and signal its teardown.
    ///
    /// Idempotent: closing twice or closing an unknown id is a no-op.
    pub fn close(&self, session_id: &str) {
        let removed = self.sessions.write().remove(session_id);
        if let Some(session) = removed {
            session.close();
            counter!("sse_disconnections_total").increment(1);
            gauge!("sse_connections_active").decrement(1.0);
            histogram!("sse_connection_duration_seconds")
                .record(session.age().as_secs_f64());
            debug!(session_id, "session closed");
        }
    }

    /// Set a session's `initialized` flag. No-op if the session is absent.
    pub fn mark_initialized(&self, session_id: &str) {
        if let Some(session) = self.sessions.read().get(session_id) {
            session.mark_initialized();
        }
    }

    /// Number of open streams.
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Close every open stream (shutdown sweep).
    pub fn close_all(&self) {
        let drained: Vec<Arc<SseSession>> =
            self.sessions.write().drain().map(|(_, s)| s).collect();
        for session in &drained {
            session.close();
            gauge!("sse_connections_active").decrement(1.0);
        }
        if !drained.is_empty() {
            debug!(count = drained.len(), "all sessions closed");
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_one(reg: &SessionRegistry) -> Arc<SseSession> {
        let (tx, _rx) = mpsc::channel(8);
        reg.open(tx)
    }

    #[test]
    fn open_assigns_unique_resolvable_ids() {
        let reg = SessionRegistry::new();
        let s1 = open_one(&reg);
        let s2 = open_one(&reg);
        assert_ne!(s1.id, s2.id);
        assert!(reg.lookup(&s1.id).is_some());
        assert!(reg.lookup(&s2.id).is_some());
        assert_eq!(reg.count(), 2);
    }

    #[test]
    fn lookup_unknown_id_is_none() {
        let reg = SessionRegistry::new();
        assert!(reg.lookup("nope").is_none());
    }

    #[test]
    fn close_removes_and_cancels() {
        let reg = SessionRegistry::new();
        let session = open_one(&reg);
        reg.close(&session.id);
        assert!(reg.lookup(&session.id).is_none());
        assert!(session.is_closed());
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let reg = SessionRegistry::new();
        let session = open_one(&reg);
        reg.close(&session.id);
        reg.close(&session.id);
        reg.close("never-existed");
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn mark_initialized_sets_flag() {
        let reg = SessionRegistry::new();
        let session = open_one(&reg);
        assert!(!session.is_initialized());
        reg.mark_initialized(&session.id);
        assert!(session.is_initialized());
    }

    #[test]
    fn mark_initialized_absent_is_noop() {
        let reg = SessionRegistry::new();
        reg.mark_initialized("ghost");
    }

    #[test]
    fn close_all_sweeps_everything() {
        let reg = SessionRegistry::new();
        let s1 = open_one(&reg);
        let s2 = open_one(&reg);
        reg.close_all();
        assert_eq!(reg.count(), 0);
        assert!(s1.is_closed());
        assert!(s2.is_closed());
    }

    #[test]
    fn sessions_are_independent() {
        let reg = SessionRegistry::new();
        let s1 = open_one(&reg);
        let s2 = open_one(&reg);
        reg.close(&s1.id);
        assert!(!s2.is_closed());
        assert!(reg.lookup(&s2.id).is_some());
    }

    #[test]
    fn concurrent_open_and_close() {
        let reg = Arc::new(SessionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = reg.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let (tx, _rx) = mpsc::channel(1);
                        let session = reg.open(tx);
                        assert!(reg.lookup(&session.id).is_some());
                        reg.close(&session.id);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.count(), 0);
    }
}
