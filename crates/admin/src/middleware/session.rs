//! Session middleware configuration for the back office.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with stricter
//! settings than the storefront (SameSite=Strict, 24hr expiry). The cookie
//! is signed with a key derived from `ADMIN_SESSION_SECRET`.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for the back office.
pub const SESSION_COOKIE_NAME: &str = "luxe_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// Sessions live in `shop.admin_session`, created by the workspace
/// migrations, apart from the storefront's sessions.
///
/// # Panics
///
/// Panics if the schema name or table name is invalid (never happens with
/// the hardcoded "shop" and "admin_session" values).
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("shop")
        .expect("valid schema name")
        .with_table_name("admin_session")
        .expect("valid table name");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&config.session_secret))
}

/// Cookie signing key: the SHA-512 digest of the session secret, which is
/// exactly the 64 bytes `Key` needs.
fn signing_key(secret: &SecretString) -> Key {
    Key::from(&Sha512::digest(secret.expose_secret().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_depends_on_secret() {
        let a = signing_key(&SecretString::from("a".repeat(32)));
        let b = signing_key(&SecretString::from("b".repeat(32)));
        assert_eq!(a.master(), signing_key(&SecretString::from("a".repeat(32))).master());
        assert_ne!(a.master(), b.master());
    }
}
