//! Method dispatch — routes a validated envelope to the protocol handlers
//! and emits zero or more messages on the caller's push stream.

use std::time::Instant;

use metrics::{counter, histogram};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::context::RpcContext;
use crate::errors::{INTERNAL_ERROR, METHOD_NOT_FOUND};
use crate::sink::EventSink;
use crate::types::{PROTOCOL_VERSION, ValidEnvelope, error_message, result_message};

/// Protocol method names.
pub mod methods {
    /// Session initialization; the only place capabilities are advertised.
    pub const INITIALIZE: &str = "initialize";
    /// List the registered capability descriptors.
    pub const TOOLS_LIST: &str = "tools/list";
    /// Invoke a registered capability.
    pub const TOOLS_CALL: &str = "tools/call";
    /// Client acknowledgment of initialization; produces no response.
    pub const NOTIFICATIONS_INITIALIZED: &str = "notifications/initialized";
}

/// Dispatch a validated call.
///
/// Independent per call: the only cross-call state is the sink's
/// `initialized` flag. The synchronous ack has already been sent by the
/// gateway; everything emitted here goes to the push stream, carrying the
/// envelope's `id` verbatim.
#[instrument(skip_all, fields(session_id = %sink.session_id(), method = %envelope.method))]
pub async fn dispatch(envelope: ValidEnvelope, sink: &dyn EventSink, ctx: &RpcContext) {
    let method = envelope.method.clone();
    counter!("rpc_requests_total", "method" => method.clone()).increment(1);
    let start = Instant::now();

    match envelope.method.as_str() {
        methods::INITIALIZE => handle_initialize(&envelope, sink, ctx),
        methods::TOOLS_LIST => handle_tools_list(&envelope, sink, ctx),
        methods::TOOLS_CALL => handle_tools_call(&envelope, sink, ctx).await,
        methods::NOTIFICATIONS_INITIALIZED => {
            // Acknowledgment alone suffices; nothing goes to the stream.
            debug!("initialization notification received");
        }
        other => {
            counter!("rpc_errors_total", "method" => method.clone(), "error_type" => "method_not_found")
                .increment(1);
            warn!("unknown RPC method");
            emit_or_drop(
                sink,
                &error_message(
                    &envelope.id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {other}"),
                ),
            );
        }
    }

    histogram!("rpc_dispatch_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

/// `initialize`: set the session flag and advertise capabilities.
///
/// Idempotent — a second `initialize` re-emits the capability set and the
/// flag stays true. Capabilities never appear in the synchronous ack.
fn handle_initialize(envelope: &ValidEnvelope, sink: &dyn EventSink, ctx: &RpcContext) {
    sink.mark_initialized();
    let result = json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": true },
            "resources": { "subscribe": true, "listChanged": true },
        },
        "serverInfo": {
            "name": ctx.server_name,
            "version": ctx.server_version,
        },
    });
    emit_or_drop(sink, &result_message(&envelope.id, result));
}

/// `tools/list`: advertise the full descriptor set and its count.
fn handle_tools_list(envelope: &ValidEnvelope, sink: &dyn EventSink, ctx: &RpcContext) {
    let tools = ctx.tools.descriptors();
    let result = json!({
        "tools": tools,
        "count": tools.len(),
    });
    emit_or_drop(sink, &result_message(&envelope.id, result));
}

/// `tools/call`: resolve the target and invoke it within the handler.
///
/// An unresolved target is a result-channel error (`-32601`), not a
/// synchronous rejection — the ack went out before the name was inspected.
/// A missing or non-string `name` resolves to the empty tool name and takes
/// the same path.
async fn handle_tools_call(envelope: &ValidEnvelope, sink: &dyn EventSink, ctx: &RpcContext) {
    let params = envelope.params.as_ref();
    let name = params
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let args = params
        .and_then(|p| p.get("arguments"))
        .cloned()
        .unwrap_or(Value::Null);

    let Some(tool) = ctx.tools.get(name) else {
        counter!("rpc_errors_total", "method" => methods::TOOLS_CALL, "error_type" => "tool_not_found")
            .increment(1);
        debug!(tool_name = name, "tool not found");
        emit_or_drop(
            sink,
            &error_message(
                &envelope.id,
                METHOD_NOT_FOUND,
                format!("Tool not found: {name}"),
            ),
        );
        return;
    };

    match tool.invoke(&args).await {
        Ok(text) => {
            let result = json!({
                "content": [{ "type": "text", "text": text }],
            });
            emit_or_drop(sink, &result_message(&envelope.id, result));
        }
        Err(err) => {
            counter!("rpc_errors_total", "method" => methods::TOOLS_CALL, "error_type" => "tool_failed")
                .increment(1);
            emit_or_drop(
                sink,
                &error_message(
                    &envelope.id,
                    INTERNAL_ERROR,
                    format!("Tool '{name}' failed: {err}"),
                ),
            );
        }
    }
}

/// Write to the stream, logging and dropping on failure.
///
/// The synchronous exchange has no further channel to report through, so a
/// closed stream is a diagnostic, not an error.
fn emit_or_drop(sink: &dyn EventSink, message: &Value) {
    if !sink.emit(message) {
        warn!(
            session_id = sink.session_id(),
            "push stream closed, dropping outbound message"
        );
    }
}
