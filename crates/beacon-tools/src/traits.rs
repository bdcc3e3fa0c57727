//! The tool trait every invokable operation implements.

use async_trait::async_trait;
use serde_json::Value;

use crate::descriptor::ToolDescriptor;
use crate::errors::ToolError;

/// An invokable operation exposed through the capability registry.
///
/// Implementations must be cheap to share (`Arc<dyn BeaconTool>`); the
/// registry dispatches invocations from many sessions concurrently.
#[async_trait]
pub trait BeaconTool: Send + Sync {
    /// Unique tool name (the `tools/call` target).
    fn name(&self) -> &str;

    /// Wire-format descriptor advertised by `tools/list`.
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool against the caller-supplied arguments.
    ///
    /// `args` is the `arguments` member of the call params, or `Value::Null`
    /// when the caller omitted it. Returns the textual result body.
    async fn invoke(&self, args: &Value) -> Result<String, ToolError>;
}
