//! Database operations for the back office.
//!
//! # Schema: `shop`
//!
//! The back office writes the rows the storefront reads:
//!
//! - `settings` - Business contact details, map location, payment client id
//!   and the back-office password hash
//! - `category` / `product` - The catalog
//! - `shipping_method` - Delivery options offered at checkout
//! - `customer_order` / `order_item` - Orders (read and status updates only)
//! - `admin_session` - Back-office session storage
//!
//! # Migrations
//!
//! Migrations live in the workspace `migrations/` directory and run via:
//! ```bash
//! cargo run -p luxe-cli -- migrate
//! ```

pub mod categories;
pub mod orders;
pub mod products;
pub mod settings;
pub mod shipping;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Turn "zero rows affected" into `NotFound`.
pub(crate) const fn require_affected(rows: u64) -> Result<(), RepositoryError> {
    if rows == 0 {
        Err(RepositoryError::NotFound)
    } else {
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_affected() {
        assert!(matches!(require_affected(0), Err(RepositoryError::NotFound)));
        assert!(require_affected(1).is_ok());
    }
}
