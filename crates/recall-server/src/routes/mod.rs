//! Route definitions for the REST API.

mod attempts;
mod health;
mod insights;
mod retention;
mod topics;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::state::AppState;

/// Optional evaluation time shared by every time-dependent endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<DateTime<Utc>>,
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Topics
        .route("/topics", post(topics::add_topic).get(topics::list_topics))
        .route(
            "/topics/:id",
            get(topics::get_topic).delete(topics::delete_topic),
        )
        .route("/topics/:id/curve", get(insights::forgetting_curve))
        .route("/topics/:id/fti", get(insights::topic_fti))
        // Recall attempts
        .route(
            "/topics/:id/attempts",
            post(attempts::record_attempt).get(attempts::list_attempts),
        )
        .route("/topics/:id/answers", post(attempts::submit_answer))
        // FTI views and reporting
        .route("/forgettable-topics", get(insights::forgettable_topics))
        .route("/dashboard", get(insights::dashboard))
        .route("/report", get(insights::report))
        // Pure retention model
        .route("/retention", get(retention::retention))
        // Attach state
        .with_state(state)
}

pub use attempts::*;
pub use health::*;
pub use insights::*;
pub use retention::*;
pub use topics::*;
