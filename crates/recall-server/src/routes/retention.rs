//! Pure retention model endpoint.

use axum::{
    extract::State,
    Json,
};
use recall_core::RetentionEstimate;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RetentionQuery {
    pub days: f64,
    pub strength: f64,
}

/// Retention and forgetting probability for given inputs.
/// GET /retention?days=&strength=
pub async fn retention(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RetentionQuery>,
) -> ApiResult<Json<RetentionEstimate>> {
    let estimate = state.engine().retention(query.days, query.strength)?;
    Ok(Json(estimate))
}
