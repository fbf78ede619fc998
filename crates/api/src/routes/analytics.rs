//! Read-only analytics and option-list endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use engine_core::{
    limits::DEFAULT_ANOMALY_THRESHOLD, AgeComparison, AnomalyRow, DistrictTrend, StateTrend,
    SummaryStats,
};
use serde::Deserialize;

use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StateParams {
    pub state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DistrictParams {
    pub district: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnomalyParams {
    pub threshold: Option<u64>,
}

/// GET /options/states
pub async fn states_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.analytics.unique_states().await?))
}

/// GET /options/districts?state=
pub async fn districts_handler(
    State(state): State<AppState>,
    Query(params): Query<StateParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(
        state
            .analytics
            .unique_districts(params.state.as_deref())
            .await?,
    ))
}

/// GET /summary
pub async fn summary_handler(
    State(state): State<AppState>,
) -> Result<Json<SummaryStats>, ApiError> {
    Ok(Json(state.analytics.overall_summary().await?))
}

/// GET /trends/state?state=
pub async fn state_trends_handler(
    State(state): State<AppState>,
    Query(params): Query<StateParams>,
) -> Result<Json<Vec<StateTrend>>, ApiError> {
    Ok(Json(
        state
            .analytics
            .trends_by_state(params.state.as_deref())
            .await?,
    ))
}

/// GET /trends/district?district=
pub async fn district_trends_handler(
    State(state): State<AppState>,
    Query(params): Query<DistrictParams>,
) -> Result<Json<Vec<DistrictTrend>>, ApiError> {
    Ok(Json(
        state
            .analytics
            .trends_by_district(params.district.as_deref())
            .await?,
    ))
}

/// GET /age-comparison
pub async fn age_comparison_handler(
    State(state): State<AppState>,
) -> Result<Json<AgeComparison>, ApiError> {
    Ok(Json(state.analytics.age_comparison().await?))
}

/// GET /anomalies?threshold=
pub async fn anomalies_handler(
    State(state): State<AppState>,
    Query(params): Query<AnomalyParams>,
) -> Result<Json<Vec<AnomalyRow>>, ApiError> {
    let threshold = params.threshold.unwrap_or(DEFAULT_ANOMALY_THRESHOLD);
    Ok(Json(state.analytics.anomalies(threshold).await?))
}
