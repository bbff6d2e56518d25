//! Integration tests for Luxe.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no database needed)
//! cargo test -p luxe-integration-tests
//!
//! # Live tests against running servers with a migrated, seeded database
//! luxe-cli migrate && luxe-cli seed --file demos/catalog.yaml
//! luxe-cli admin set-password --password "$ADMIN_TEST_PASSWORD"
//! cargo test -p luxe-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Running storefront (default: `http://localhost:3000`)
//! - `ADMIN_BASE_URL` - Running back office (default: `http://localhost:3001`)
//! - `ADMIN_TEST_PASSWORD` - Back-office password for the live admin tests

use std::path::Path;

use reqwest::Client;
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use luxe_admin::config::AdminConfig;
use luxe_core::settings::DEFAULT_BUSINESS_ID;
use luxe_storefront::config::StorefrontConfig;

/// Database URL that is never connected to.
const UNUSED_DATABASE_URL: &str = "postgres://localhost/luxe_unused";

/// Base URL of the running storefront.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Base URL of the running back office.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

/// HTTP client that keeps session cookies between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("shopper+{}@luxe.test", uuid::Uuid::new_v4().simple())
}

/// Pool that connects on first use, for routers whose tested paths never
/// touch the database.
///
/// # Panics
///
/// Panics if the URL cannot be parsed.
#[must_use]
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy(UNUSED_DATABASE_URL)
        .expect("Failed to create lazy pool")
}

/// Storefront configuration serving media from `media_root`.
///
/// # Panics
///
/// Panics if the loopback address does not parse.
#[must_use]
pub fn storefront_config(media_root: &Path) -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from(UNUSED_DATABASE_URL),
        host: "127.0.0.1".parse().expect("loopback address"),
        port: 3000,
        base_url: "http://localhost:3000".to_owned(),
        session_secret: SecretString::from("s".repeat(32)),
        allowed_origin: None,
        business_id: DEFAULT_BUSINESS_ID,
        media_root: media_root.to_path_buf(),
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Back-office configuration writing media to `media_root`.
///
/// # Panics
///
/// Panics if the loopback address does not parse.
#[must_use]
pub fn admin_config(media_root: &Path) -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from(UNUSED_DATABASE_URL),
        host: "127.0.0.1".parse().expect("loopback address"),
        port: 3001,
        base_url: "http://localhost:3001".to_owned(),
        session_secret: SecretString::from("a".repeat(32)),
        business_id: DEFAULT_BUSINESS_ID,
        media_root: media_root.to_path_buf(),
        media_base_url: "http://localhost:3000/media".to_owned(),
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}
