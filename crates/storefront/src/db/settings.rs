//! Business settings query.

use sqlx::PgPool;

use luxe_core::BusinessId;
use luxe_core::settings::SettingsRow;

use super::RepositoryError;

/// Fetch the raw settings row, if the business has one.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
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
