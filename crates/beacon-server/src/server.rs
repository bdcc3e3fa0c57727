//! `BeaconServer` — axum HTTP + SSE gateway.
//!
//! The gateway opens push streams (`GET /sse`), accepts call envelopes
//! (`POST /messages`), and tears streams down on disconnect. Every call is
//! answered synchronously before its dispatcher runs; asynchronous results
//! reach the caller on the stream located through the session registry.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use beacon_rpc::{RpcContext, SyncAck, dispatch, validate};
use futures::Stream;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::shutdown::ShutdownCoordinator;
use crate::sse::heartbeat::run_heartbeat;
use crate::sse::registry::SessionRegistry;
use crate::sse::EVENT_ENDPOINT;

/// Shared state accessible from axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Open push streams.
    pub sessions: Arc<SessionRegistry>,
    /// Dispatcher dependencies.
    pub ctx: Arc<RpcContext>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
    /// Heartbeat period.
    pub heartbeat_interval: Duration,
    /// Per-session push channel capacity.
    pub channel_capacity: usize,
    /// Renders the `/metrics` endpoint.
    pub metrics_handle: PrometheusHandle,
}

/// The main beacon server.
pub struct BeaconServer {
    config: ServerConfig,
    sessions: Arc<SessionRegistry>,
    ctx: Arc<RpcContext>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
    metrics_handle: PrometheusHandle,
}

impl BeaconServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, ctx: RpcContext, metrics_handle: PrometheusHandle) -> Self {
        Self {
            config,
            sessions: Arc::new(SessionRegistry::new()),
            ctx: Arc::new(ctx),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
            metrics_handle,
        }
    }

    /// Build the axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            sessions: self.sessions.clone(),
            ctx: self.ctx.clone(),
            shutdown: self.shutdown.clone(),
            start_time: self.start_time,
            heartbeat_interval: Duration::from_secs(self.config.heartbeat_interval_secs),
            channel_capacity: self.config.channel_capacity,
            metrics_handle: self.metrics_handle.clone(),
        };

        Router::new()
            .route("/sse", get(sse_handler))
            .route("/messages", post(messages_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind and serve. Returns the bound address and the serve task handle.
    ///
    /// The serve task exits when the shutdown coordinator fires, sweeping
    /// all open streams on the way out.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let token = self.shutdown.token();

        // Open SSE responses only end once their sessions close, so the
        // sweep must run alongside graceful shutdown, not after it.
        let sweep_sessions = self.sessions.clone();
        let sweep_token = self.shutdown.token();
        let _sweeper = tokio::spawn(async move {
            sweep_token.cancelled().await;
            sweep_sessions.close_all();
        });

        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await });
            if let Err(e) = serve.await {
                error!(error = %e, "server error");
            }
        });

        info!(%addr, "server listening");
        Ok((addr, handle))
    }

    /// Get the session registry.
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Removes the session from the registry when the stream is dropped,
/// whatever the exit path — client disconnect, send error, or shutdown.
struct StreamGuard {
    sessions: Arc<SessionRegistry>,
    session_id: String,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        debug!(session_id = %self.session_id, "push stream dropped");
        self.sessions.close(&self.session_id);
    }
}

/// GET /sse — open a push stream.
///
/// Registers the session, emits the `endpoint` discovery event naming the
/// call-submission target before anything else, and starts the heartbeat.
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::channel::<Event>(state.channel_capacity);
    let session = state.sessions.open(tx);
    let session_id = session.id.clone();
    info!(session_id, "push stream opened");

    let hb_session = session.clone();
    let hb_cancel = session.cancel_token();
    let hb_interval = state.heartbeat_interval;
    let hb_id = session_id.clone();
    let _heartbeat = tokio::spawn(async move {
        let result = run_heartbeat(hb_session, hb_interval, hb_cancel).await;
        debug!(session_id = hb_id, ?result, "heartbeat stopped");
    });

    let endpoint = format!("/messages?sessionId={session_id}");
    let guard = StreamGuard {
        sessions: state.sessions.clone(),
        session_id,
    };

    let stream = async_stream::stream! {
        let _guard = guard;
        // Discovery first: the endpoint event always precedes any protocol
        // event on this stream.
        yield Ok(Event::default().event(EVENT_ENDPOINT).data(endpoint));
        while let Some(event) = rx.recv().await {
            yield Ok(event);
        }
    };

    Sse::new(stream)
}

/// Query parameters for `POST /messages`.
#[derive(Debug, Deserialize)]
struct MessagesQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// POST /messages — accept one call envelope.
///
/// Missing `sessionId` is a client error; an unknown session is not found.
/// Otherwise the synchronous ack (or synchronous `-32600` error body) is
/// returned before the dispatcher performs any stream write for this call.
async fn messages_handler(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing sessionId query parameter"})),
        )
            .into_response();
    };

    let Some(session) = state.sessions.lookup(&session_id) else {
        warn!(session_id, "call for unknown session");
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("Session not found: {session_id}")})),
        )
            .into_response();
    };

    let raw: Option<Value> = serde_json::from_slice(&body).ok();
    let envelope = match validate(raw.as_ref()) {
        Ok(envelope) => envelope,
        Err(rejection) => {
            debug!(session_id, error = %rejection, "envelope rejected");
            counter!("rpc_errors_total", "method" => "none", "error_type" => "invalid_request")
                .increment(1);
            // Terminal for this exchange; no asynchronous follow-up.
            return (StatusCode::OK, Json(rejection.to_error_body())).into_response();
        }
    };

    let ack = SyncAck::for_envelope(&envelope);
    let ctx = state.ctx.clone();
    let _dispatch = tokio::spawn(async move {
        dispatch(envelope, &*session, &ctx).await;
    });

    (StatusCode::OK, Json(ack)).into_response()
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time, state.sessions.count()))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    crate::metrics::render(&state.metrics_handle)
}
