//! Per-stream keep-alive emitter.

use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::Event;
use serde_json::json;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::EVENT_HEARTBEAT;
use super::session::SseSession;

/// Outcome of the heartbeat loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeartbeatResult {
    /// The push channel's receive half is gone.
    Closed,
    /// The heartbeat was cancelled externally (disconnect or shutdown).
    Cancelled,
}

/// Emit keep-alives on a fixed period for the stream's entire lifetime.
///
/// Each tick writes a `heartbeat` event carrying the current timestamp.
/// Exits exactly once, on every teardown path: the session's cancellation
/// token fires, or the channel's receive half disappears. A full channel
/// drops the tick but keeps the timer running.
pub async fn run_heartbeat(
    session: Arc<SseSession>,
    interval: Duration,
    cancel: CancellationToken,
) -> HeartbeatResult {
    let mut ticker = time::interval(interval);
    // The first tick fires immediately; the stream's endpoint event comes
    // first, so skip it.
    let _ = ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let payload = json!({
                    "timestamp": chrono::Utc::now()
                        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                });
                let event = match Event::default().event(EVENT_HEARTBEAT).json_data(&payload) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(session_id = %session.id, error = %e, "failed to encode heartbeat");
                        continue;
                    }
                };
                if !session.send_event(event) && session.is_stream_closed() {
                    return HeartbeatResult::Closed;
                }
            }
            () = cancel.cancelled() => {
                return HeartbeatResult::Cancelled;
            }
        }
    }
}
