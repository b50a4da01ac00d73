//! Counter Error Types
//!
//! Counter-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::sqlx_error_kind;
use kernel::error::{app_error::AppError, code, kind::ErrorKind};
use platform::session::AccessDenied;
use thiserror::Error;

use crate::domain::value_object::{CounterOutOfRange, UnknownCounterField};

/// Counter-specific result type alias
pub type CounterResult<T> = Result<T, CounterError>;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error(transparent)]
    UnknownField(#[from] UnknownCounterField),

    /// `valor` is not a JSON integer
    #[error("Counter value must be an integer")]
    NotAnInteger,

    #[error(transparent)]
    OutOfRange(#[from] CounterOutOfRange),

    /// The counters row does not exist
    #[error("Counters not found")]
    NotFound,

    #[error(transparent)]
    Access(#[from] AccessDenied),

    /// Request rejected by an extractor
    #[error("{0}")]
    Rejected(AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CounterError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.to_app_error().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        self.to_app_error().kind()
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CounterError::UnknownField(_) | CounterError::NotAnInteger => code::VALIDATION_ERROR,
            CounterError::OutOfRange(_) => code::VALUE_OUT_OF_RANGE,
            CounterError::NotFound => code::NOT_FOUND,
            CounterError::Internal(_) => code::INTERNAL_ERROR,
            CounterError::Access(_) | CounterError::Rejected(_) | CounterError::Database(_) => {
                self.to_app_error().code()
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            CounterError::UnknownField(_) => AppError::bad_request(self.to_string())
                .with_code(code::VALIDATION_ERROR)
                .with_action("Use \"entregues\" or \"prometidas\""),
            CounterError::NotAnInteger => AppError::bad_request(self.to_string())
                .with_code(code::VALIDATION_ERROR)
                .with_action("Send a whole number"),
            CounterError::OutOfRange(e) => AppError::bad_request(self.to_string())
                .with_code(code::VALUE_OUT_OF_RANGE)
                .with_action(format!("Send a value between 0 and {}", e.max)),
            CounterError::NotFound => AppError::not_found(self.to_string()),
            CounterError::Access(denied) => denied.to_app_error(),
            CounterError::Rejected(err) => {
                let mut app_err =
                    AppError::new(err.kind(), err.message().to_string()).with_code(err.code());
                if let Some(action) = err.action() {
                    app_err = app_err.with_action(action.to_string());
                }
                app_err
            }
            CounterError::Database(e) => AppError::new(sqlx_error_kind(e), "Storage is unavailable"),
            CounterError::Internal(_) => AppError::internal("Internal error"),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CounterError::Database(e) => {
                tracing::error!(error = %e, "Counter database error");
            }
            CounterError::Internal(msg) => {
                tracing::error!(message = %msg, "Counter internal error");
            }
            CounterError::Access(denied) => {
                tracing::warn!(reason = %denied, "Access denied");
            }
            CounterError::Rejected(err) if err.is_server_error() => {
                tracing::error!(error = %err, "Counter request failed");
            }
            _ => {
                tracing::debug!(error = %self, "Counter error");
            }
        }
    }
}

impl IntoResponse for CounterError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for CounterError {
    fn from(err: AppError) -> Self {
        CounterError::Rejected(err)
    }
}
