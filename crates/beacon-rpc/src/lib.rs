//! # beacon-rpc
//!
//! Protocol layer for the SSE push-RPC transport.
//!
//! - Wire types: call envelopes, synchronous acks, push-message builders
//! - Envelope validation against the JSON-RPC 2.0 shape
//! - Method dispatch (`initialize`, `tools/list`, `tools/call`,
//!   `notifications/initialized`)
//! - [`EventSink`]: the side-channel write capability a dispatched call
//!   emits its asynchronous results to

#![deny(unsafe_code)]

pub mod context;
pub mod dispatch;
pub mod errors;
pub mod sink;
pub mod types;
pub mod validation;

pub use context::RpcContext;
pub use dispatch::dispatch;
pub use sink::EventSink;
pub use types::{JSONRPC_VERSION, PROTOCOL_VERSION, SyncAck, ValidEnvelope};
pub use validation::{EnvelopeRejection, validate};
