//! Recall attempt endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use recall_core::{NewRecallAttempt, RecallAttempt, RecordedAttempt, SubmittedAnswer};
use serde::Serialize;

use super::AsOfQuery;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AttemptsResponse {
    pub results: Vec<RecallAttempt>,
}

/// Record an attempt with a known outcome.
/// POST /topics/:id/attempts
pub async fn record_attempt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
    ApiJson(request): ApiJson<NewRecallAttempt>,
) -> ApiResult<(StatusCode, Json<RecordedAttempt>)> {
    let recorded = state
        .engine()
        .record_attempt(&id, request, state.as_of(query.as_of))?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// Grade a free-text answer and record the attempt.
/// POST /topics/:id/answers
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
    ApiJson(request): ApiJson<SubmittedAnswer>,
) -> ApiResult<(StatusCode, Json<RecordedAttempt>)> {
    let recorded = state
        .engine()
        .submit_answer(&id, request, state.as_of(query.as_of))?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// List a topic's attempts, oldest first.
/// GET /topics/:id/attempts
pub async fn list_attempts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AttemptsResponse>> {
    let results = state.engine().attempts(&id)?;
    Ok(Json(AttemptsResponse { results }))
}
