//! Shipping method database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use luxe_core::order::ShippingMethod;
use luxe_core::{BusinessId, ShippingMethodId};

use super::{RepositoryError, require_affected};

/// A shipping method to insert. New methods are active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShippingMethod {
    pub description: String,
    pub price: Decimal,
    pub delivery_days: i32,
}

/// Partial shipping method update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingMethodUpdate {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub delivery_days: Option<i32>,
    pub active: Option<bool>,
}

/// All methods for the business, including inactive ones.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_methods(
    pool: &PgPool,
    business_id: BusinessId,
) -> Result<Vec<ShippingMethod>, RepositoryError> {
    let methods = sqlx::query_as::<_, ShippingMethod>(
        r"
        SELECT id, description, price, delivery_days, active
        FROM shop.shipping_method
        WHERE business_id = $1
        ORDER BY id
        ",
    )
    .bind(business_id)
    .fetch_all(pool)
    .await?;
    Ok(methods)
}

/// Insert an active method.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn create_method(
    pool: &PgPool,
    business_id: BusinessId,
    method: &NewShippingMethod,
) -> Result<ShippingMethod, RepositoryError> {
    let created = sqlx::query_as::<_, ShippingMethod>(
        r"
        INSERT INTO shop.shipping_method (business_id, description, price, delivery_days, active)
        VALUES ($1, $2, $3, $4, TRUE)
        RETURNING id, description, price, delivery_days, active
        ",
    )
    .bind(business_id)
    .bind(&method.description)
    .bind(method.price)
    .bind(method.delivery_days)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Update a method.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the method does not belong to the
/// business, or an error if the query fails.
pub async fn update_method(
    pool: &PgPool,
    business_id: BusinessId,
    id: ShippingMethodId,
    update: &ShippingMethodUpdate,
) -> Result<ShippingMethod, RepositoryError> {
    sqlx::query_as::<_, ShippingMethod>(
        r"
        UPDATE shop.shipping_method SET
            description   = COALESCE($3, description),
            price         = COALESCE($4, price),
            delivery_days = COALESCE($5, delivery_days),
            active        = COALESCE($6, active)
        WHERE business_id = $1 AND id = $2
        RETURNING id, description, price, delivery_days, active
        ",
    )
    .bind(business_id)
    .bind(id)
    .bind(update.description.as_deref())
    .bind(update.price)
    .bind(update.delivery_days)
    .bind(update.active)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Delete a method. Orders keep the description they were placed with.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if nothing was deleted.
pub async fn delete_method(
    pool: &PgPool,
    business_id: BusinessId,
    id: ShippingMethodId,
) -> Result<(), RepositoryError> {
    let result =
        sqlx::query("DELETE FROM shop.shipping_method WHERE business_id = $1 AND id = $2")
            .bind(business_id)
            .bind(id)
            .execute(pool)
            .await?;
    require_affected(result.rows_affected())
}
