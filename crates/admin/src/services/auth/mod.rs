//! Back-office authentication.
//!
//! A single shared password per business, stored as an argon2id hash on the
//! settings row. There are no back-office user accounts.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use luxe_core::BusinessId;
use luxe_core::settings::BusinessSettings;

use crate::db::settings;
use crate::services::email::{EmailService, generate_temporary_password};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Back-office authentication service.
pub struct AdminAuthService<'a> {
    pool: &'a PgPool,
    business_id: BusinessId,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, business_id: BusinessId) -> Self {
        Self { pool, business_id }
    }

    /// Check the back-office password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::PasswordNotConfigured` when no password is
    /// set, `AdminAuthError::InvalidCredentials` when it does not match.
    pub async fn login(&self, password: &str) -> Result<(), AdminAuthError> {
        let hash = settings::get_settings(self.pool, self.business_id)
            .await?
            .and_then(|row| row.online_password)
            .filter(|hash| !hash.is_empty())
            .ok_or(AdminAuthError::PasswordNotConfigured)?;

        verify_password(password, &hash)
    }

    /// Replace the password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::WeakPassword` if the password is too short.
    pub async fn set_password(&self, password: &str) -> Result<(), AdminAuthError> {
        let hash = hash_password(password)?;
        settings::set_password_hash(self.pool, self.business_id, &hash).await?;
        tracing::info!(business_id = %self.business_id, "Back-office password changed");
        Ok(())
    }

    /// Email a fresh temporary password to the business, then store it.
    ///
    /// The stored password only changes once the email has been accepted by
    /// the relay.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Email` if sending fails; the old password
    /// stays valid in that case.
    pub async fn reset_password(
        &self,
        mailer: &EmailService,
        business: &BusinessSettings,
    ) -> Result<(), AdminAuthError> {
        let temporary = generate_temporary_password();
        let hash = hash_password(&temporary)?;

        mailer
            .send_temporary_password(&business.email, &business.business_name, &temporary)
            .await?;

        settings::set_password_hash(self.pool, self.business_id, &hash).await?;
        tracing::info!(business_id = %self.business_id, "Temporary back-office password issued");
        Ok(())
    }
}

/// Validate password requirements.
///
/// # Errors
///
/// Returns `AdminAuthError::WeakPassword` if shorter than the minimum.
pub fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate then hash a password with Argon2id.
///
/// # Errors
///
/// Returns `AdminAuthError::WeakPassword` or `AdminAuthError::PasswordHash`.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    validate_password(password)?;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}
