//! API routes.

pub mod analytics;
pub mod health;
pub mod sync;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use engine_core::limits::MAX_UPLOAD_BYTES;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/upload", post(upload::upload_handler))
        .route("/sync-api", post(sync::sync_handler))
        .route("/clear-data", delete(upload::clear_handler))
        .route("/options/states", get(analytics::states_handler))
        .route("/options/districts", get(analytics::districts_handler))
        .route("/summary", get(analytics::summary_handler))
        .route("/trends/state", get(analytics::state_trends_handler))
        .route("/trends/district", get(analytics::district_trends_handler))
        .route("/age-comparison", get(analytics::age_comparison_handler))
        .route("/anomalies", get(analytics::anomalies_handler))
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
