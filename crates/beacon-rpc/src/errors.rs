//! JSON-RPC error codes.
//!
//! The code set is closed and fixed: it follows the JSON-RPC 2.0 convention
//! so existing callers can interpret failures without a custom table.

/// Malformed call envelope.
pub const INVALID_REQUEST: i64 = -32600;
/// Method or invocation target not found.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Parameters present but unusable.
pub const INVALID_PARAMS: i64 = -32602;
/// Handler failed internally.
pub const INTERNAL_ERROR: i64 = -32603;
