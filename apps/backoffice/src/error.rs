//! # API Error Type
//!
//! Unified error type for the HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Error Flow in Stockbook                           │
//! │                                                                     │
//! │  Front-end                  Rust Backend                            │
//! │  ─────────                  ────────────                            │
//! │                                                                     │
//! │  POST /sales                                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Handler: Result<Json<T>, ApiError>                                 │
//! │       │                                                             │
//! │       ├── ValidationError ──► 400 VALIDATION_ERROR                  │
//! │       ├── DbError::NotFound ─► 404 NOT_FOUND                        │
//! │       ├── DbError::Conflict ─► 409 CONFLICT                         │
//! │       ├── InsufficientStock ─► 422 INSUFFICIENT_STOCK               │
//! │       └── anything else ─────► 500 DATABASE_ERROR / INTERNAL        │
//! │                                                                     │
//! │  ◄── { "code": "INSUFFICIENT_STOCK",                                │
//! │        "message": "Insufficient stock for Rugby Ball: ..." }        │
//! │                                                                     │
//! │  The front-end shows the message as a toast and branches on code.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use stockbook_core::{CoreError, ValidationError};
use stockbook_db::DbError;

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// This is what the front-end receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 7f9c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
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

    /// Uniqueness or concurrent-write conflict (409)
    Conflict,

    /// A sale would drive stock negative (422)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
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

/// Converts store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Conflict { entity, id } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} {} was modified concurrently, reload and retry", entity, id),
            ),
            DbError::InsufficientStock {
                product,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product, available, requested
                ),
            ),
            DbError::CorruptDocument { entity, id, .. } => {
                tracing::error!(%entity, %id, "Corrupt document in store");
                ApiError::new(ErrorCode::DatabaseError, "Stored record is corrupt")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::InsufficientStock {
                product,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product, available, requested
                ),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Lets handlers use `?` directly on validation functions.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let api: ApiError = DbError::not_found("Product", "p-1").into();
        assert_eq!(api.code, ErrorCode::NotFound);

        let api: ApiError = DbError::duplicate("company code", "vargo").into();
        assert_eq!(api.code, ErrorCode::Conflict);

        let api: ApiError = DbError::InsufficientStock {
            product: "Rugby Ball".to_string(),
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(api.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_validation_error_mapping() {
        let api: ApiError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.message, "name is required");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InsufficientStock.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
