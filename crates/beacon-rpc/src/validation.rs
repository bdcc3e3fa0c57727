//! Envelope validation — gates malformed input before dispatch.

use serde_json::Value;

use crate::errors::INVALID_REQUEST;
use crate::types::{JSONRPC_VERSION, ValidEnvelope, error_message};

/// A rejected envelope.
///
/// Carries the envelope's `id` when one was present, else JSON `null`, so
/// the synchronous error body can still echo it. The `id` field is never
/// omitted from the error response.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EnvelopeRejection {
    /// Echoed correlation token, or `Value::Null` when absent.
    pub id: Value,
    /// What was wrong with the envelope.
    pub message: String,
}

impl EnvelopeRejection {
    /// Render as the synchronous JSON-RPC error body (`-32600`).
    pub fn to_error_body(&self) -> Value {
        error_message(&self.id, INVALID_REQUEST, self.message.clone())
    }
}

/// Validate a raw inbound payload against the protocol envelope shape.
///
/// `raw` is `None` when the exchange carried no parseable JSON body.
/// Rejects when the payload is absent or not an object, the protocol tag is
/// missing or mismatched, or `method` is absent.
pub fn validate(raw: Option<&Value>) -> Result<ValidEnvelope, EnvelopeRejection> {
    let Some(raw) = raw else {
        return Err(EnvelopeRejection {
            id: Value::Null,
            message: "Invalid request: missing payload".into(),
        });
    };

    let Some(obj) = raw.as_object() else {
        return Err(EnvelopeRejection {
            id: Value::Null,
            message: "Invalid request: payload must be a JSON object".into(),
        });
    };

    // Opaque correlation token, echoed verbatim from here on.
    let id = obj.get("id").cloned().unwrap_or(Value::Null);

    if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(EnvelopeRejection {
            id,
            message: format!("Invalid request: jsonrpc must be \"{JSONRPC_VERSION}\""),
        });
    }

    let Some(method) = obj.get("method").and_then(Value::as_str) else {
        return Err(EnvelopeRejection {
            id,
            message: "Invalid request: missing method".into(),
        });
    };

    Ok(ValidEnvelope {
        id,
        method: method.to_owned(),
        params: obj.get("params").cloned(),
    })
}
