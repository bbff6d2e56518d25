//! Customer profile repository.

use sqlx::PgPool;

use luxe_core::Email;

use super::{RepositoryError, conflict_or_database};
use crate::models::Profile;

#[derive(sqlx::FromRow)]
struct ProfileWithHash {
    #[sqlx(flatten)]
    profile: Profile,
    password_hash: String,
}

/// Repository for customer profiles.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile and its password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Profile, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileWithHash>(
            r"
            SELECT id, email, full_name, created_at, password_hash
            FROM shop.profile
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(|r| (r.profile, r.password_hash)))
    }

    /// Create a profile with a password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        full_name: &str,
        password_hash: &str,
    ) -> Result<Profile, RepositoryError> {
        sqlx::query_as::<_, Profile>(
            r"
            INSERT INTO shop.profile (email, full_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, full_name, created_at
            ",
        )
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "email"))
    }
}
