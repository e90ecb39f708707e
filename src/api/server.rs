//! HTTP server for the state API.
//!
//! # Responsibilities
//! - Create the Axum router with the two read endpoints
//! - Wire up middleware (request timeout, tracing)
//! - Serve with graceful shutdown tied to the lifecycle channel

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::ServerConfig;
use crate::store::StateStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<StateStore>,
}

/// HTTP server exposing the state store.
pub struct StateApi {
    config: ServerConfig,
    store: Arc<StateStore>,
}

impl StateApi {
    pub fn new(config: ServerConfig, store: Arc<StateStore>) -> Self {
        Self { config, store }
    }

    /// Serve on the given listener until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let app = build_router(&self.config, self.store);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;
        tracing::info!("state API stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &ServerConfig, store: Arc<StateStore>) -> Router {
    Router::new()
        .route("/state", get(state_handler))
        .route("/ready", get(ready_handler))
        .with_state(ApiState { store })
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
}

/// Current snapshot: per-document status/checksum plus the generation.
async fn state_handler(State(state): State<ApiState>) -> Response {
    let Some(snapshot) = state.store.current() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "uninitialized" })),
        )
            .into_response();
    };

    let documents: serde_json::Map<String, serde_json::Value> = snapshot
        .report
        .entries
        .iter()
        .map(|entry| {
            (
                entry.name.clone(),
                json!({
                    "status": entry.status.to_string(),
                    "path": entry.path,
                    "required": entry.required,
                    "detail": entry.detail,
                    "checksum": entry.checksum,
                }),
            )
        })
        .collect();

    let loaded_at = snapshot
        .loaded_at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "generation": snapshot.generation,
            "loaded_at": loaded_at,
            "stale": state.store.is_stale(),
            "documents": documents,
        })),
    )
        .into_response()
}

/// Readiness check: ready iff at least one validated snapshot is live.
async fn ready_handler(State(state): State<ApiState>) -> Response {
    let generation = state.store.generation();
    let ready = generation >= 1;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "ready": ready,
            "generation": generation,
            "stale": state.store.is_stale(),
        })),
    )
        .into_response()
}
