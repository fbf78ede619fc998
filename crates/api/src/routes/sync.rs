//! Registry sync endpoint.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use registry::SyncRequest;

use crate::response::{ApiError, MessageResponse};
use crate::state::AppState;

/// Human-readable suffix naming the filters a sync ran with.
fn filter_summary(request: &SyncRequest) -> String {
    let mut parts = Vec::new();
    if let Some(state) = request.state.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("state={}", state));
    }
    if let Some(district) = request.district.as_deref().filter(|d| !d.is_empty()) {
        parts.push(format!("district={}", district));
    }
    if request.fetch_all {
        parts.push("FETCH_ALL=True".to_string());
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" with filters: {}", parts.join(", "))
    }
}

/// POST /sync-api - Pull pages from the public registry.
///
/// Query: `limit`, `offset`, `state`, `district`, `fetch_all`.
pub async fn sync_handler(
    State(state): State<AppState>,
    query: Result<Query<SyncRequest>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(request) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let report = state.sync.sync(&request).await?;

    Ok(Json(MessageResponse::with_records(
        format!(
            "Successfully synced {} records from API{}.",
            report.records_synced,
            filter_summary(&request)
        ),
        report.records_synced as u64,
    )))
}
