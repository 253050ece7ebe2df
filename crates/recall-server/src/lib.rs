//! recall-server - REST API server for recall.
//!
//! Exposes topic management, recall attempts, the Forgettable Topic Index,
//! forgetting curves and the performance report over JSON.
//!
//! # Example
//!
//! ```ignore
//! use recall_core::{RecallConfig, RecallEngine};
//! use recall_server::{create_server, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = RecallEngine::with_sqlite(RecallConfig::from_env()).unwrap();
//!     let app = create_server(AppState::new(engine));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
