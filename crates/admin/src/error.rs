//! Unified error handling for the back office.
//!
//! Every handler returns `Result<T, AppError>`. Responses are JSON:
//! `{"error": "..."}`, plus `"fields"` for validation failures. Server-side
//! failures go to Sentry and the log with their detail hidden from clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AdminAuthError;
use crate::services::email::EmailError;
use crate::services::media::MediaError;
use crate::services::validation::ValidationError;

/// Application-level error type for the back office.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Sending mail failed.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Media storage failed.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Form fields failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Feature needs configuration that is missing (e.g. SMTP).
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials | AdminAuthError::PasswordNotConfigured => {
                    StatusCode::UNAUTHORIZED
                }
                AdminAuthError::WeakPassword(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AdminAuthError::EmailNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                AdminAuthError::Email(_) => StatusCode::BAD_GATEWAY,
                AdminAuthError::Repository(_) | AdminAuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Email(_) => StatusCode::BAD_GATEWAY,
            Self::Media(err) => match err {
                MediaError::UnsupportedType(_) | MediaError::InvalidName(_) | MediaError::Empty => {
                    StatusCode::BAD_REQUEST
                }
                MediaError::NotFound => StatusCode::NOT_FOUND,
                MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    // Don't expose internal error details to clients
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_owned()
            }
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials => "Incorrect password".to_owned(),
                AdminAuthError::PasswordNotConfigured => {
                    "No back-office password has been set".to_owned()
                }
                AdminAuthError::WeakPassword(msg) => msg.clone(),
                AdminAuthError::EmailNotConfigured => "Email is not configured".to_owned(),
                AdminAuthError::Email(_) => "Failed to send email".to_owned(),
                AdminAuthError::Repository(_) | AdminAuthError::PasswordHash => {
                    "Authentication error".to_owned()
                }
            },
            Self::Email(_) => "Failed to send email".to_owned(),
            Self::Media(err) => match err {
                MediaError::UnsupportedType(_) => "Only image files can be uploaded".to_owned(),
                MediaError::InvalidName(_) => "Invalid file name".to_owned(),
                MediaError::Empty => "The uploaded file is empty".to_owned(),
                MediaError::NotFound => "Image not found".to_owned(),
                MediaError::Io(_) => "Internal server error".to_owned(),
            },
            Self::Validation(_) => "Please correct the highlighted fields".to_owned(),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Unavailable(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let body = match &self {
            Self::Validation(err) => json!({
                "error": self.public_message(),
                "fields": err.fields,
            }),
            _ => json!({ "error": self.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use rust_decimal::Decimal;

    use super::*;
    use crate::services::validation::validate_new_product;

    async fn body(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_errors_carry_fields() {
        let err = validate_new_product(None, Some(Decimal::ONE), Some("bag")).unwrap_err();
        let (status, value) = body(err.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(value["fields"]["name"], "Please enter a product name");
    }

    #[tokio::test]
    async fn test_repository_not_found_is_404() {
        let (status, value) = body(AppError::Database(RepositoryError::NotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["error"], "Not found");
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let (status, value) = body(AppError::Internal("disk on fire".to_owned())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"], "Internal server error");
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            AppError::Auth(AdminAuthError::PasswordNotConfigured).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AdminAuthError::EmailNotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Media(MediaError::UnsupportedType("a.pdf".to_owned())).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
