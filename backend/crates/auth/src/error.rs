//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Variant text is diagnostic and only ever logged. What the client sees
//! comes from [`AuthError::to_app_error`], which never includes internal
//! detail.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

use crate::domain::repository::StoreError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Client-facing rejection reasons
pub mod reason {
    pub const MISSING_TOKEN: &str = "missing token unauthorized";
    pub const TOKEN_VALIDATION_FAILED: &str = "token validation failed unauthorized";
    pub const USER_CHECK_FAILED: &str = "user check failed unauthorized";
    pub const MISSING_IDENTITY: &str = "unauthorized";
    pub const MISSING_CSRF_TOKEN: &str = "missing CSRF token";
    pub const INVALID_CSRF_TOKEN: &str = "invalid CSRF token";
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------
    // Session manager
    // ------------------------------------------------------------------
    /// Persisting or deleting a session failed
    #[error("Session store write failed: {0}")]
    StoreWrite(#[source] StoreError),

    /// Reading a session failed
    #[error("Session store read failed: {0}")]
    StoreRead(#[source] StoreError),

    /// No session for the presented token
    #[error("Session not found")]
    SessionNotFound,

    /// The stored session value is not a user identifier
    #[error("Stored session value is not a user identifier")]
    InvalidIdentifier,

    // ------------------------------------------------------------------
    // CSRF tokens
    // ------------------------------------------------------------------
    #[error("CSRF token signing failed: {0}")]
    Signing(String),

    #[error("Invalid CSRF token: {0}")]
    InvalidToken(String),

    #[error("CSRF token expired")]
    TokenExpired,

    // ------------------------------------------------------------------
    // Use cases
    // ------------------------------------------------------------------
    /// Unknown login or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login already exists
    #[error("Login already taken")]
    LoginTaken,

    /// Sign-up input rejected
    #[error("Validation failed: {0}")]
    Validation(&'static str),

    /// Password hashing error
    #[error(transparent)]
    Password(#[from] PasswordHashError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A user repository call outlived the store timeout
    #[error("User repository timed out")]
    RepositoryTimeout,

    // ------------------------------------------------------------------
    // Middleware rejections
    // ------------------------------------------------------------------
    /// Authentication stage rejection
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Request rejected before reaching the handler
    #[error("{0}")]
    BadRequest(&'static str),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::SessionNotFound
            | AuthError::InvalidIdentifier
            | AuthError::InvalidCredentials
            | AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::InvalidToken(_)
            | AuthError::TokenExpired
            | AuthError::Validation(_)
            | AuthError::BadRequest(_) => ErrorKind::BadRequest,
            AuthError::LoginTaken => ErrorKind::Conflict,
            AuthError::StoreRead(_)
            | AuthError::StoreWrite(_)
            | AuthError::RepositoryTimeout
            | AuthError::Signing(_)
            | AuthError::Password(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError
    ///
    /// Only the fixed rejection strings reach the client.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::Unauthorized(_) | AuthError::BadRequest(_) => self.to_string(),
            AuthError::SessionNotFound | AuthError::InvalidIdentifier => {
                reason::TOKEN_VALIDATION_FAILED.to_string()
            }
            AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                reason::INVALID_CSRF_TOKEN.to_string()
            }
            AuthError::InvalidCredentials => "invalid credentials".to_string(),
            AuthError::LoginTaken => "login already taken".to_string(),
            AuthError::Validation(msg) => (*msg).to_string(),
            AuthError::StoreRead(_)
            | AuthError::StoreWrite(_)
            | AuthError::RepositoryTimeout
            | AuthError::Signing(_)
            | AuthError::Password(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => "internal server error".to_string(),
        };
        AppError::new(self.kind(), message)
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::StoreRead(e) | AuthError::StoreWrite(e) => {
                tracing::error!(error = %e, "Session store error");
            }
            AuthError::RepositoryTimeout => {
                tracing::error!("User repository timed out");
            }
            AuthError::Password(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            AuthError::Signing(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
