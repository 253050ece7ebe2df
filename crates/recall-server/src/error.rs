//! Error handling for the REST API server.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recall_core::error::RecallError;
use serde::Serialize;
use std::fmt;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                suggestion: self.suggestion,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from recall-core errors
impl From<RecallError> for ApiError {
    fn from(err: RecallError) -> Self {
        let code = err.code().as_str();
        let suggestion = err.suggestion().map(str::to_string);
        let message = err.to_string();

        let api = match err {
            RecallError::InvalidArgument { .. } => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, code, message)
            }
            RecallError::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, code, message),
            RecallError::Configuration(_) => ApiError::new(StatusCode::BAD_REQUEST, code, message),
            RecallError::Database { .. }
            | RecallError::Io(_)
            | RecallError::Serialization(_)
            | RecallError::Internal(_) => {
                tracing::error!(error = %message, "Request failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
            }
        };

        match suggestion {
            Some(s) => api.with_suggestion(s),
            None => api,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        from_rejection(rejection.status(), rejection.body_text())
            .with_suggestion("Send a JSON body with Content-Type: application/json")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        from_rejection(rejection.status(), rejection.body_text())
    }
}

fn from_rejection(status: StatusCode, message: String) -> ApiError {
    let code = if status == StatusCode::UNPROCESSABLE_ENTITY {
        "VALIDATION_ERROR"
    } else {
        "BAD_REQUEST"
    };
    ApiError::new(status, code, message)
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
