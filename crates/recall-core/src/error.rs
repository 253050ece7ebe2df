//! Error types for recall operations.
//!
//! Every fallible operation in the crate returns [`RecallResult`]. Errors carry a
//! structured [`ErrorCode`] so that callers (the REST server in particular) can
//! map them without matching on message text.

use thiserror::Error;

/// Result type alias for recall operations.
pub type RecallResult<T> = Result<T, RecallError>;

/// Main error type for all recall operations.
#[derive(Error, Debug)]
pub enum RecallError {
    /// An argument was outside its documented domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Topic not found.
    #[error("Topic not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        topic_id: Option<String>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValOutOfRange,
    ValMissingField,

    // Topic (TOP_xxx)
    TopicNotFound,
    TopicDuplicate,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValOutOfRange => "VAL_002",
            ErrorCode::ValMissingField => "VAL_003",
            ErrorCode::TopicNotFound => "TOP_001",
            ErrorCode::TopicDuplicate => "TOP_002",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RecallError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create an invalid-argument error for a value outside its allowed range.
    pub fn out_of_range(field: &str, value: impl std::fmt::Display, range: &str) -> Self {
        Self::InvalidArgument {
            message: format!("{} must be within {}, got {}", field, range, value),
            code: ErrorCode::ValOutOfRange,
            suggestion: Some(format!("Provide a {} within {}", field, range)),
        }
    }

    /// Create an invalid-argument error for a missing or empty field.
    pub fn missing_field(field: &str) -> Self {
        Self::InvalidArgument {
            message: format!("{} must not be empty", field),
            code: ErrorCode::ValMissingField,
            suggestion: None,
        }
    }

    /// Create a not found error.
    pub fn not_found(topic_id: impl Into<String>) -> Self {
        let id = topic_id.into();
        Self::NotFound {
            message: format!("Topic with id '{}' not found", id),
            code: ErrorCode::TopicNotFound,
            topic_id: Some(id),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Database { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { suggestion, .. } => suggestion.as_deref(),
            Self::NotFound { .. } => Some("Please check the topic ID and ensure it exists"),
            Self::Database { .. } => Some("Please check the database path and permissions"),
            Self::Configuration(_) => Some("Please check the configuration file and environment"),
            _ => None,
        }
    }

    /// Whether the error was caused by caller input rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::NotFound { .. } | Self::Configuration(_)
        )
    }
}

impl From<rusqlite::Error> for RecallError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
