//! SSE session lifecycle: stream registry, per-session state, heartbeats.

pub mod heartbeat;
pub mod registry;
pub mod session;

/// Event name for protocol content on the push stream.
pub const EVENT_MESSAGE: &str = "message";
/// Event name for keep-alives.
pub const EVENT_HEARTBEAT: &str = "heartbeat";
/// Event name for the initial endpoint announcement.
pub const EVENT_ENDPOINT: &str = "endpoint";
