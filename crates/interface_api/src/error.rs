//! API error handling
//!
//! Every failure maps to a stable (status, error_type) pair:
//! ledger rule violations are 422 (fix the request), workflow conflicts
//! are 409 (wrong state, not wrong data), and transient concurrency
//! conflicts are 503 with the expectation that the client retries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_documents::DocumentError;
use domain_ledger::LedgerError;
use infra_db::{DatabaseError, DocumentStoreError, PostingError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Workflow conflict: the document is in the wrong state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Ledger or input rule violation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transient contention; the client should retry
    #[error("Temporarily unavailable: {0}")]
    Busy(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
            ApiError::Busy(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "concurrency_conflict",
                msg.clone(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
            ApiError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(_) | LedgerError::BatchNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            LedgerError::AccountAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::InvalidTransition { .. } | DocumentError::DocumentLocked(_) => {
                ApiError::Conflict(err.to_string())
            }
            DocumentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DocumentError::Ledger(inner) => inner.into(),
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match &err {
            DatabaseError::NotFound(msg) => ApiError::NotFound(msg.clone()),
            DatabaseError::DuplicateEntry(msg) => ApiError::Conflict(msg.clone()),
            DatabaseError::ConcurrencyConflict(_) | DatabaseError::PoolExhausted => {
                ApiError::Busy(err.to_string())
            }
            DatabaseError::ConstraintViolation(msg) | DatabaseError::ForeignKeyViolation(msg) => {
                ApiError::Validation(msg.clone())
            }
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<PostingError> for ApiError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Ledger(inner) => inner.into(),
            PostingError::Database(inner) => inner.into(),
        }
    }
}

impl From<DocumentStoreError> for ApiError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::Domain(inner) => inner.into(),
            DocumentStoreError::Posting(inner) => inner.into(),
            DocumentStoreError::Database(inner) => inner.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::from_sqlx(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unbalanced_batch_maps_to_422() {
        let err: ApiError = LedgerError::UnbalancedBatch {
            debits: dec!(100),
            credits: dec!(90),
        }
        .into();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_locked_document_maps_to_conflict() {
        let err: ApiError = DocumentError::locked("SB0001 is CONFIRMED").into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_concurrency_conflict_maps_to_busy() {
        let err: ApiError = DatabaseError::ConcurrencyConflict("deadlock".into()).into();
        assert!(matches!(err, ApiError::Busy(_)));
    }
}
