//! Identity Error Types
//!
//! This module provides identity-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::sqlx_error_kind;
use kernel::error::{app_error::AppError, code, kind::ErrorKind};
use platform::field_cipher::CipherError;
use platform::session::AccessDenied;
use thiserror::Error;

use crate::domain::value_object::credential::CredentialError;
use crate::domain::value_object::person_name::PersonNameError;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Missing or empty CPF / phone
    #[error(transparent)]
    InvalidCredential(#[from] CredentialError),

    #[error(transparent)]
    InvalidName(#[from] PersonNameError),

    /// CPF and phone both exist but on different records
    #[error("CPF and phone do not match")]
    MismatchedCredentials,

    #[error("Wrong phone for this CPF")]
    WrongPhoneForId,

    #[error("Wrong CPF for this phone")]
    WrongIdForPhone,

    /// Lost the registration race on a unique fingerprint
    #[error("CPF or phone already registered")]
    DuplicateCredential,

    #[error("Identity not found")]
    NotFound,

    #[error("Name was already completed")]
    NameAlreadySet,

    #[error("Administrators cannot delete themselves")]
    SelfDeleteForbidden,

    #[error("Administrators cannot be deleted")]
    AdminDeleteForbidden,

    #[error("Administrators cannot change their own role")]
    SelfRoleChangeForbidden,

    #[error("At least one administrator must remain")]
    LastAdminForbidden,

    /// CSRF, authentication or role rejection
    #[error(transparent)]
    Access(#[from] AccessDenied),

    /// Request rejected by an extractor (body or path)
    #[error("{0}")]
    Rejected(AppError),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.to_app_error().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidCredential(_)
            | IdentityError::InvalidName(_)
            | IdentityError::DuplicateCredential => ErrorKind::BadRequest,
            IdentityError::MismatchedCredentials
            | IdentityError::WrongPhoneForId
            | IdentityError::WrongIdForPhone
            | IdentityError::SelfDeleteForbidden
            | IdentityError::AdminDeleteForbidden
            | IdentityError::SelfRoleChangeForbidden
            | IdentityError::LastAdminForbidden => ErrorKind::Forbidden,
            IdentityError::NotFound => ErrorKind::NotFound,
            IdentityError::NameAlreadySet => ErrorKind::Conflict,
            IdentityError::Access(denied) => denied.to_app_error().kind(),
            IdentityError::Rejected(err) => err.kind(),
            IdentityError::Cipher(_) | IdentityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
            IdentityError::Database(_) => self.to_app_error().kind(),
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::InvalidCredential(_) => code::VALIDATION_ERROR,
            IdentityError::InvalidName(e) => e.code(),
            IdentityError::MismatchedCredentials => code::MISMATCHED_CREDENTIALS,
            IdentityError::WrongPhoneForId => code::WRONG_PHONE_FOR_ID,
            IdentityError::WrongIdForPhone => code::WRONG_ID_FOR_PHONE,
            IdentityError::DuplicateCredential => code::DUPLICATE_CREDENTIAL,
            IdentityError::NotFound => code::NOT_FOUND,
            IdentityError::NameAlreadySet => code::NAME_ALREADY_SET,
            IdentityError::SelfDeleteForbidden => code::SELF_DELETE_FORBIDDEN,
            IdentityError::AdminDeleteForbidden => code::ADMIN_DELETE_FORBIDDEN,
            IdentityError::SelfRoleChangeForbidden => code::SELF_ROLE_CHANGE_FORBIDDEN,
            IdentityError::LastAdminForbidden => code::LAST_ADMIN_FORBIDDEN,
            IdentityError::Cipher(CipherError::Decryption) => code::DECRYPTION_ERROR,
            IdentityError::Cipher(_) | IdentityError::Internal(_) => code::INTERNAL_ERROR,
            IdentityError::Access(_) | IdentityError::Rejected(_) | IdentityError::Database(_) => {
                self.to_app_error().code()
            }
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message; the detail stays in logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            IdentityError::Access(denied) => denied.to_app_error(),
            IdentityError::Rejected(err) => {
                let mut app_err = AppError::new(err.kind(), err.message().to_string())
                    .with_code(err.code());
                if let Some(action) = err.action() {
                    app_err = app_err.with_action(action.to_string());
                }
                app_err
            }
            IdentityError::Database(e) => AppError::new(sqlx_error_kind(e), "Storage is unavailable"),
            IdentityError::Cipher(_) | IdentityError::Internal(_) => {
                AppError::internal("Internal error").with_code(self.code())
            }
            IdentityError::InvalidName(e) => AppError::new(self.kind(), self.to_string())
                .with_code(self.code())
                .with_action(e.action()),
            _ => AppError::new(self.kind(), self.to_string()).with_code(self.code()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            IdentityError::Database(e) => {
                tracing::error!(error = %e, "Identity database error");
            }
            IdentityError::Cipher(e) => {
                tracing::error!(error = %e, "Identity cipher error");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::MismatchedCredentials
            | IdentityError::WrongPhoneForId
            | IdentityError::WrongIdForPhone => {
                tracing::warn!(code = self.code(), "Credential mismatch");
            }
            IdentityError::Access(denied) => {
                tracing::warn!(reason = %denied, "Access denied");
            }
            IdentityError::Rejected(err) if err.is_server_error() => {
                tracing::error!(error = %err, "Identity request failed");
            }
            IdentityError::SelfDeleteForbidden
            | IdentityError::AdminDeleteForbidden
            | IdentityError::SelfRoleChangeForbidden
            | IdentityError::LastAdminForbidden => {
                tracing::warn!(code = self.code(), "Admin operation refused");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for IdentityError {
    fn from(err: AppError) -> Self {
        IdentityError::Rejected(err)
    }
}
