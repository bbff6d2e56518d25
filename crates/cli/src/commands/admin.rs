//! Back-office access commands.
//!
//! # Usage
//!
//! ```bash
//! # Prompt for the password on stdin
//! luxe-cli admin set-password
//!
//! # Non-interactive
//! luxe-cli admin set-password --password 'correct horse'
//! ```

use std::io::BufRead;

use thiserror::Error;

use luxe_admin::db;
use luxe_admin::services::auth::{AdminAuthError, AdminAuthService, validate_password};

use super::{CommandError, business_id, database_url};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// No password was given.
    #[error("No password provided")]
    MissingPassword,

    /// Reading stdin failed.
    #[error("Failed to read password: {0}")]
    Io(#[from] std::io::Error),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password rejected or could not be stored.
    #[error(transparent)]
    Auth(#[from] AdminAuthError),
}

/// Set the shared back-office password, creating the settings row when
/// missing.
///
/// # Errors
///
/// Returns an error if the password is too short or cannot be stored.
pub async fn set_password(password: Option<String>) -> Result<(), AdminError> {
    let password = match password {
        Some(password) => password,
        None => read_password(std::io::stdin().lock())?,
    };
    // Fail before connecting.
    validate_password(&password)?;

    let database_url = database_url()?;
    let business_id = business_id()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    AdminAuthService::new(&pool, business_id)
        .set_password(&password)
        .await?;

    tracing::info!(business_id = %business_id, "Back-office password updated");
    Ok(())
}

/// First line of `input`, without its line ending.
fn read_password(mut input: impl BufRead) -> Result<String, AdminError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        return Err(AdminError::MissingPassword);
    }
    Ok(password)
}
