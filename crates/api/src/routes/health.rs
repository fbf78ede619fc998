//! Health, metrics and welcome endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, metrics, HealthStatus, MetricsSnapshot};

use crate::response::{HealthResponse, MessageResponse};
use crate::state::AppState;

/// GET / - Welcome message.
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Enrolment Analytics API"))
}

/// GET /health - Full health check.
///
/// Pings the store so the report reflects the current connection rather than
/// the last background check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = state.store.ping().await;
    if store_ok {
        health().store.set_healthy();
    } else {
        health().store.set_unhealthy("store ping failed");
    }

    let records = if store_ok {
        state.store.count().await.ok()
    } else {
        None
    };

    let registry_ok = health().registry.is_healthy();
    let status = match (store_ok, registry_ok) {
        (true, true) => HealthStatus::Healthy,
        (true, false) => HealthStatus::Degraded,
        (false, _) => HealthStatus::Unhealthy,
    };

    Json(HealthResponse {
        status,
        store_connected: store_ok,
        registry_reachable: registry_ok,
        records,
    })
}

/// GET /health/ready - Readiness probe (can accept traffic).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /metrics - JSON snapshot of in-process counters.
pub async fn metrics_handler() -> Json<MetricsSnapshot> {
    Json(metrics().snapshot())
}
