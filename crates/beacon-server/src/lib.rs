//! # beacon-server
//!
//! Axum HTTP + SSE push-RPC server.
//!
//! - `GET /sse`: opens a long-lived push stream; the first event names the
//!   call-submission endpoint for that session
//! - `POST /messages?sessionId=..`: accepts one call envelope, answers with
//!   the synchronous ack, and dispatches asynchronous results to the stream
//! - Per-stream heartbeat keep-alives on a fixed period
//! - `/health` and `/metrics` endpoints
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod sse;
