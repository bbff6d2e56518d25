//! Subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

use luxe_core::BusinessId;
use luxe_core::settings::DEFAULT_BUSINESS_ID;

/// Errors shared by every command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable has an unusable value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// `DATABASE_URL` after loading `.env`.
pub fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))
}

/// `STORE_BUSINESS_ID`, defaulting like the servers do.
pub fn business_id() -> Result<BusinessId, CommandError> {
    match std::env::var("STORE_BUSINESS_ID") {
        Ok(raw) => raw
            .trim()
            .parse::<i32>()
            .map(BusinessId::new)
            .map_err(|e| CommandError::InvalidEnvVar("STORE_BUSINESS_ID", e.to_string())),
        Err(_) => Ok(DEFAULT_BUSINESS_ID),
    }
}
