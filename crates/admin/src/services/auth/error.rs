//! Back-office authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::email::EmailError;

/// Errors that can occur during back-office authentication.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No password has been set for the business yet.
    #[error("no back-office password configured")]
    PasswordNotConfigured,

    /// Password too short.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Mail needed for a reset is not configured.
    #[error("email is not configured")]
    EmailNotConfigured,

    /// Sending the reset email failed.
    #[error("email error: {0}")]
    Email(#[from] EmailError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
