//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Booktopia                              │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │         │                                                               │
//! │         ├── bad route/body? ── ValidationError ──────┐                  │
//! │         │                                            │                  │
//! │         ├── id mismatch?    ── CoreError ────────────┤                  │
//! │         │                                            ▼                  │
//! │         ├── storage failed? ── DbError ─────────► ApiError              │
//! │         │                                            │                  │
//! │         ▼                                            ▼                  │
//! │      Success                           status + { "code", "message" }   │
//! │                                                                         │
//! │  VALIDATION_ERROR  400    rejected before any query                     │
//! │  NOT_FOUND         404    single-key lookups only                       │
//! │  CONFLICT          500    concurrent modification, never retried        │
//! │  DATABASE_ERROR    500    constraint violations, pool, I/O              │
//! │  INTERNAL          500                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Server-side failures are logged when converted; clients only get a
//! generic message for them.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use booktopia_core::{CoreError, ValidationError};
use booktopia_db::DbError;

/// Error body returned by every failing route.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Title not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Concurrent modification detected (500)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict | ErrorCode::DatabaseError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Storage failures. Only not-found and conflict keep their details; every
/// other cause is logged and answered with a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let message = match &err {
            DbError::NotFound { entity, id } => return ApiError::not_found(entity, id),
            DbError::Invalid(e) => return ApiError::validation(e.to_string()),
            DbError::Conflict { entity, id } => {
                tracing::error!(%entity, %id, "Concurrent modification detected");
                return ApiError::new(
                    ErrorCode::Conflict,
                    format!("{entity} {id} was modified concurrently"),
                );
            }
            DbError::Internal(_) => {
                tracing::error!(error = %err, "Unexpected storage failure");
                return ApiError::internal("Internal server error");
            }
            DbError::ForeignKeyViolation { .. } => "Record is still referenced",
            DbError::UniqueViolation { .. } | DbError::CheckViolation { .. } => {
                "Database constraint violated"
            }
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => "Database unavailable",
            DbError::MigrationFailed(_) => "Database migration failed",
            DbError::QueryFailed(_) | DbError::TransactionFailed(_) => "Database operation failed",
        };

        tracing::error!(error = %err, "Storage operation failed");
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TitleNotFound(id) => ApiError::not_found("Title", &id.to_string()),
            CoreError::IdMismatch { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Malformed or incomplete JSON bodies are client errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
