//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the beacon server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Heartbeat period in seconds (protocol default `10`).
    pub heartbeat_interval_secs: u64,
    /// Per-session push channel capacity.
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            heartbeat_interval_secs: 10,
            channel_capacity: 1024,
        }
    }
}
