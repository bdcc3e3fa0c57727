//! JSON-RPC wire-format types for the SSE push transport.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The fixed protocol tag every envelope must carry.
pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revision advertised by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// A call envelope that passed validation.
///
/// `id` is the caller-chosen correlation token. It is opaque: every response
/// related to this call echoes it verbatim, whatever JSON value it is.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidEnvelope {
    /// Correlation token, echoed verbatim in every response.
    pub id: Value,
    /// Method name (e.g. `tools/call`).
    pub method: String,
    /// Optional parameters object.
    pub params: Option<Value>,
}

/// The immediate reply to a call-submission exchange.
///
/// Carries only the envelope's `id` and a method-name echo; results and
/// capabilities are never delivered here, only on the push stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncAck {
    /// Protocol tag.
    pub jsonrpc: String,
    /// Echoed correlation token.
    pub id: Value,
    /// Minimal acknowledgment body.
    pub result: AckBody,
}

/// Body of a [`SyncAck`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AckBody {
    /// The acknowledged method name.
    pub method: String,
}

impl SyncAck {
    /// Acknowledge a validated envelope.
    pub fn for_envelope(envelope: &ValidEnvelope) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id: envelope.id.clone(),
            result: AckBody {
                method: envelope.method.clone(),
            },
        }
    }
}

/// Build an asynchronous result message for the push stream.
pub fn result_message(id: &Value, result: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result,
    })
}

/// Build an asynchronous error message for the push stream.
pub fn error_message(id: &Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(id: Value, method: &str) -> ValidEnvelope {
        ValidEnvelope {
            id,
            method: method.into(),
            params: None,
        }
    }

    #[test]
    fn ack_echoes_id_and_method() {
        let ack = SyncAck::for_envelope(&envelope(json!("req_1"), "initialize"));
        let v = serde_json::to_value(&ack).unwrap();
        assert_eq!(v["jsonrpc"], "2.0");
        assert_eq!(v["id"], "req_1");
        assert_eq!(v["result"]["method"], "initialize");
    }

    #[test]
    fn ack_preserves_numeric_id() {
        let ack = SyncAck::for_envelope(&envelope(json!(42), "tools/list"));
        let v = serde_json::to_value(&ack).unwrap();
        assert_eq!(v["id"], 42);
    }

    #[test]
    fn ack_carries_no_capabilities() {
        let ack = SyncAck::for_envelope(&envelope(json!("r"), "initialize"));
        let json = serde_json::to_string(&ack).unwrap();
        assert!(!json.contains("capabilities"));
        assert!(!json.contains("protocolVersion"));
    }

    #[test]
    fn result_message_shape() {
        let msg = result_message(&json!("abc"), json!({"ok": true}));
        assert_eq!(msg["jsonrpc"], "2.0");
        assert_eq!(msg["id"], "abc");
        assert_eq!(msg["result"]["ok"], true);
        assert!(msg.get("error").is_none());
    }

    #[test]
    fn error_message_shape() {
        let msg = error_message(&json!(7), -32601, "Method not found: nope");
        assert_eq!(msg["id"], 7);
        assert_eq!(msg["error"]["code"], -32601);
        assert_eq!(msg["error"]["message"], "Method not found: nope");
        assert!(msg.get("result").is_none());
    }

    #[test]
    fn error_message_with_null_id() {
        let msg = error_message(&Value::Null, -32600, "bad");
        assert!(msg["id"].is_null());
        // The id field itself must be present even when null.
        assert!(msg.as_object().unwrap().contains_key("id"));
    }
}
