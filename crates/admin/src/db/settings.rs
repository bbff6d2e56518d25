//! Business settings database operations.
//!
//! There is one settings row per business, keyed by the business id. Writes
//! upsert so a fresh database needs no seed row.

use sqlx::PgPool;

use luxe_core::BusinessId;
use luxe_core::settings::SettingsRow;

use super::RepositoryError;

/// Fields changed by a settings update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub business_name: Option<String>,
    pub map_location: Option<String>,
    pub paypal_client_id: Option<String>,
    /// Argon2 PHC string.
    pub online_password: Option<String>,
}

/// Fetch the raw settings row, if the business has one.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_settings(
    pool: &PgPool,
    business_id: BusinessId,
) -> Result<Option<SettingsRow>, RepositoryError> {
    let row = sqlx::query_as::<_, SettingsRow>(
        r"
        SELECT id, email, phone, address, business_name, map_location,
               paypal_client_id, online_password
        FROM shop.settings
        WHERE id = $1
        ",
    )
    .bind(business_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Apply an update, creating the row when missing.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn update_settings(
    pool: &PgPool,
    business_id: BusinessId,
    update: &SettingsUpdate,
) -> Result<SettingsRow, RepositoryError> {
    let row = sqlx::query_as::<_, SettingsRow>(
        r"
        INSERT INTO shop.settings
            (id, email, phone, address, business_name, map_location,
             paypal_client_id, online_password)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            email            = COALESCE(EXCLUDED.email, shop.settings.email),
            phone            = COALESCE(EXCLUDED.phone, shop.settings.phone),
            address          = COALESCE(EXCLUDED.address, shop.settings.address),
            business_name    = COALESCE(EXCLUDED.business_name, shop.settings.business_name),
            map_location     = COALESCE(EXCLUDED.map_location, shop.settings.map_location),
            paypal_client_id = COALESCE(EXCLUDED.paypal_client_id, shop.settings.paypal_client_id),
            online_password  = COALESCE(EXCLUDED.online_password, shop.settings.online_password),
            updated_at       = NOW()
        RETURNING id, email, phone, address, business_name, map_location,
                  paypal_client_id, online_password
        ",
    )
    .bind(business_id)
    .bind(update.email.as_deref())
    .bind(update.phone.as_deref())
    .bind(update.address.as_deref())
    .bind(update.business_name.as_deref())
    .bind(update.map_location.as_deref())
    .bind(update.paypal_client_id.as_deref())
    .bind(update.online_password.as_deref())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Replace the back-office password hash, creating the row when missing.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn set_password_hash(
    pool: &PgPool,
    business_id: BusinessId,
    hash: &str,
) -> Result<(), RepositoryError> {
    let update = SettingsUpdate {
        online_password: Some(hash.to_owned()),
        ..SettingsUpdate::default()
    };
    update_settings(pool, business_id, &update).await?;
    Ok(())
}
