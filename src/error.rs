//! Application error type and its HTTP representation.
//!
//! Every error carries a human-readable `message` and a JSON `details` payload.
//! Both are rendered into a stable response body:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "not_found",
//!     "message": "Short link not found",
//!     "details": { "code": "abc123" }
//!   }
//! }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Response envelope for errors.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Client-visible error description.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by the service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input or a disallowed URL scheme.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// No record exists for the given code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Storage-level uniqueness violation.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// The underlying store failed or could not be reached.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    /// The allocator could not find a free code within its attempt budget.
    #[error("{message}")]
    CodeSpaceExhausted { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn code_space_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CodeSpaceExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::StoreUnavailable { .. } | AppError::CodeSpaceExhausted { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } => "invalid_input",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::StoreUnavailable { .. } => "store_unavailable",
            AppError::CodeSpaceExhausted { .. } => "code_space_exhausted",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::InvalidInput { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::StoreUnavailable { message, details }
            | AppError::CodeSpaceExhausted { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");

        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::store_unavailable("Database pool unavailable", json!({}))
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                AppError::store_unavailable("Database connection failed", json!({}))
            }
            _ => AppError::store_unavailable("Database error", json!({})),
        }
    }
}

/// Bodies that are not JSON, or do not match the request shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_input(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_default();
        AppError::invalid_input("Validation failed", details)
    }
}
