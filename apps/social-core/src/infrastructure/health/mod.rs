//! Health Check and Metrics Endpoint
//!
//! # Endpoints
//!
//! - `GET /health` - JSON health status with registry statistics
//! - `GET /healthz` - liveness probe (simple OK)
//! - `GET /readyz` - readiness probe (not ready once shutdown has begun)
//! - `GET /metrics` - Prometheus metrics in text format

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::application::services::RegistryStats;
use crate::observability::get_metrics_handle;

/// What the health endpoint reports on.
pub trait HealthSource: Send + Sync {
    /// Current registry counts.
    fn registry_stats(&self) -> RegistryStats;

    /// Connected real-time relays.
    fn notification_receivers(&self) -> usize;
}

// =============================================================================
// Health Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Service version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Subscription registry counts.
    pub subscriptions: RegistryStats,
    /// Connected notification relays.
    pub notification_receivers: usize,
}

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Serving, but notifications have nowhere to go.
    Degraded,
}

// =============================================================================
// Health Server
// =============================================================================

/// Shared state for the health server.
pub struct HealthServerState {
    version: String,
    started_at: Instant,
    source: Arc<dyn HealthSource>,
    cancel: CancellationToken,
}

impl HealthServerState {
    /// Create new health server state.
    #[must_use]
    pub fn new(version: String, source: Arc<dyn HealthSource>, cancel: CancellationToken) -> Self {
        Self {
            version,
            started_at: Instant::now(),
            source,
            cancel,
        }
    }
}

/// Health check HTTP server.
pub struct HealthServer {
    port: u16,
    state: Arc<HealthServerState>,
    cancel: CancellationToken,
}

impl HealthServer {
    /// Create a new health server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<HealthServerState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the health server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `HealthServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), HealthServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HealthServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Health server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| HealthServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Health server stopped");
        Ok(())
    }
}

/// Build the health router.
pub fn router(state: Arc<HealthServerState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/readyz", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn health_handler(State(state): State<Arc<HealthServerState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(build_health_response(&state)))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readiness_handler(State(state): State<Arc<HealthServerState>>) -> impl IntoResponse {
    if state.cancel.is_cancelled() {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    } else {
        (StatusCode::OK, "READY")
    }
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

fn build_health_response(state: &HealthServerState) -> HealthResponse {
    let receivers = state.source.notification_receivers();

    HealthResponse {
        status: determine_health_status(receivers),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        subscriptions: state.source.registry_stats(),
        notification_receivers: receivers,
    }
}

const fn determine_health_status(receivers: usize) -> HealthStatus {
    if receivers > 0 {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Health server errors.
#[derive(Debug, thiserror::Error)]
pub enum HealthServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================
