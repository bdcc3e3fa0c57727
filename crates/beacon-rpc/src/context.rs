//! Shared context handed to the dispatcher.

use std::sync::Arc;

use beacon_tools::ToolRegistry;

/// Dependencies the dispatcher needs: the capability registry and the
/// server identity advertised by `initialize`.
///
/// Injected by reference into every dispatch; there is no module-level
/// state.
pub struct RpcContext {
    /// The external capability registry.
    pub tools: Arc<ToolRegistry>,
    /// Server name for `serverInfo`.
    pub server_name: String,
    /// Server version for `serverInfo`.
    pub server_version: String,
}

impl RpcContext {
    /// Build a context with the default server identity.
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self {
            tools,
            server_name: "beacon".into(),
            server_version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
