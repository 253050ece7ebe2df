//! Server state management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use recall_core::RecallEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RecallEngine>,
}

impl AppState {
    /// Create state around a ready engine.
    pub fn new(engine: RecallEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &RecallEngine {
        &self.engine
    }

    /// Resolve the evaluation time for a request: the explicit `as_of`
    /// parameter when given, otherwise the current time.
    pub fn as_of(&self, requested: Option<DateTime<Utc>>) -> DateTime<Utc> {
        requested.unwrap_or_else(Utc::now)
    }
}
