//! Axum-based HTTP surface for the UI adapter.
//!
//! The UI issues typed requests against `/v1/message` and always receives an
//! envelope with status 200; failures are values, not HTTP errors. The
//! context-menu trigger has its own route, independent of the request path.

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use moctale_core::{config::ServerConfig, types::RelayRequest, Error, Result};

use crate::router::RequestRouter;

/// HTTP surface configuration.
#[derive(Debug, Clone)]
pub struct RelayServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for RelayServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

impl From<&ServerConfig> for RelayServerConfig {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            host: cfg.host.clone(),
            port: cfg.port,
            enable_cors: cfg.enable_cors,
            enable_tracing: cfg.enable_tracing,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Request router.
    pub router: Arc<RequestRouter>,
}

/// Relay HTTP server.
pub struct RelayServer {
    config: RelayServerConfig,
    state: Arc<AppState>,
}

impl RelayServer {
    /// Create a new relay server.
    pub fn new(config: RelayServerConfig, router: Arc<RequestRouter>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { router }),
        }
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v1/message", post(message_handler))
            .route("/v1/pending-search", post(pending_search_handler))
            .with_state(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::internal(format!("failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = %addr, "relay server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::internal(format!("server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Context-menu trigger payload.
#[derive(Debug, Deserialize)]
pub struct PendingSearchPayload {
    /// Selected text to stash for the next UI activation.
    pub query: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Typed request dispatch handler.
async fn message_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RelayRequest>,
) -> impl IntoResponse {
    let trace_id = Uuid::new_v4().to_string();
    tracing::debug!(trace_id = %trace_id, request = ?request, "dispatching relay request");

    let envelope = state.router.handle(request).await;

    tracing::debug!(
        trace_id = %trace_id,
        success = envelope.is_success(),
        "relay request handled"
    );
    Json(envelope)
}

/// Out-of-band trigger handler.
async fn pending_search_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PendingSearchPayload>,
) -> impl IntoResponse {
    let envelope = match state.router.stash_pending_search(&payload.query).await {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::error!(error = %e, "pending search stash failed");
            moctale_core::types::Envelope::from_error(&e)
        }
    };
    Json(envelope)
}
