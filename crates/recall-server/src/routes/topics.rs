//! Topic CRUD endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use recall_core::{NewTopic, Topic};
use serde::Serialize;

use super::AsOfQuery;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Response for listing topics.
#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub results: Vec<Topic>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Add a topic.
/// POST /topics
pub async fn add_topic(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
    ApiJson(request): ApiJson<NewTopic>,
) -> ApiResult<(StatusCode, Json<Topic>)> {
    let topic = state
        .engine()
        .add_topic(request, state.as_of(query.as_of))?;
    Ok((StatusCode::CREATED, Json(topic)))
}

/// List all topics with their FTI refreshed.
/// GET /topics
pub async fn list_topics(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> ApiResult<Json<TopicsResponse>> {
    let results = state.engine().list_topics(state.as_of(query.as_of))?;
    Ok(Json(TopicsResponse { results }))
}

/// Get a topic by ID with its FTI refreshed.
/// GET /topics/:id
pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> ApiResult<Json<Topic>> {
    let topic = state.engine().get_topic(&id, state.as_of(query.as_of))?;
    Ok(Json(topic))
}

/// Delete a topic and its attempts.
/// DELETE /topics/:id
pub async fn delete_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.engine().delete_topic(&id)?;
    Ok(Json(MessageResponse {
        message: "Topic deleted successfully".to_string(),
    }))
}
