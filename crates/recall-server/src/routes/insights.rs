//! FTI, forgetting curve, dashboard and report endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use recall_core::{Dashboard, ForgettableTopics, FtiAssessment, PerformanceReport, TopicCurve};

use super::AsOfQuery;
use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::state::AppState;

/// Refresh and return a topic's FTI breakdown.
/// GET /topics/:id/fti
pub async fn topic_fti(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> ApiResult<Json<FtiAssessment>> {
    let assessment = state.engine().refresh_fti(&id, state.as_of(query.as_of))?;
    Ok(Json(assessment))
}

/// Forgetting curve and revision checkpoints.
/// GET /topics/:id/curve
pub async fn forgetting_curve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> ApiResult<Json<TopicCurve>> {
    let curve = state
        .engine()
        .forgetting_curve(&id, state.as_of(query.as_of))?;
    Ok(Json(curve))
}

/// Topics ranked by FTI with category counts.
/// GET /forgettable-topics
pub async fn forgettable_topics(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> ApiResult<Json<ForgettableTopics>> {
    let listing = state
        .engine()
        .forgettable_topics(state.as_of(query.as_of))?;
    Ok(Json(listing))
}

/// Topics ranked by FTI with alerts.
/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.engine().dashboard(state.as_of(query.as_of))?))
}

/// Performance report.
/// GET /report
pub async fn report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> ApiResult<Json<PerformanceReport>> {
    Ok(Json(state.engine().report(state.as_of(query.as_of))?))
}
