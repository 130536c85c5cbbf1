//! HTTP error type and its JSON rendering.
//!
//! Every error leaves the service as `{ "error": message, "code": CODE }`.
//! Insufficient-stock rejections also carry `current_stock` and `requested`
//! so a client can show what is actually on the shelf.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockroom_core::error::CoreError;
use stockroom_db::repositories::LedgerError;

/// Error returned by every handler.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `stockroom_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected failure; the message is logged but never sent to the client.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(core) => AppError::Core(core),
            LedgerError::Store(db) => AppError::Database(db),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested: Option<i32>,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            current_stock: None,
            requested: None,
        }
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Core(core) => core_error_body(core),
            AppError::Database(err) => classify_sqlx_error(&err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

fn core_error_body(err: CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", msg),
        ),
        CoreError::InsufficientStock {
            current_stock,
            requested,
            ..
        } => {
            let message =
                format!("Insufficient stock: requested {requested}, available {current_stock}");
            let body = ErrorBody {
                current_stock: Some(current_stock),
                requested: Some(requested),
                ..ErrorBody::new("INSUFFICIENT_STOCK", message)
            };
            (StatusCode::CONFLICT, body)
        }
        CoreError::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("UNAUTHORIZED", msg),
        ),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg)),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
            )
        }
    }
}

/// Map a sqlx error to a status and body.
///
/// | Error                                        | Status | Code                |
/// |----------------------------------------------|--------|---------------------|
/// | `RowNotFound`                                | 404    | `NOT_FOUND`         |
/// | `23505` on a `uq_*` constraint               | 409    | `CONFLICT`          |
/// | `40001` serialization, `40P01` deadlock      | 409    | `CONFLICT`          |
/// | `23503` foreign key, `23514` check           | 400    | `VALIDATION_ERROR`  |
/// | pool timed out or closed, I/O, TLS           | 503    | `STORE_UNAVAILABLE` |
/// | anything else                                | 500    | `INTERNAL_ERROR`    |
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    ErrorBody::new(
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    ),
                ),
                Some("40001" | "40P01") => {
                    tracing::warn!(error = %db_err, "Transaction aborted by concurrent update");
                    (
                        StatusCode::CONFLICT,
                        ErrorBody::new("CONFLICT", "Concurrent update detected, please retry"),
                    )
                }
                Some("23503") => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new(
                        "VALIDATION_ERROR",
                        format!("Referenced record does not exist: {constraint}"),
                    ),
                ),
                Some("23514") => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new(
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    ),
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
                    )
                }
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => {
            tracing::error!(error = %err, "Database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody::new("STORE_UNAVAILABLE", "The database is temporarily unavailable"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
            )
        }
    }
}
