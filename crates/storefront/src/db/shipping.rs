//! Shipping method queries.

use sqlx::PgPool;

use luxe_core::order::ShippingMethod;
use luxe_core::{BusinessId, ShippingMethodId};

use super::RepositoryError;

/// Repository for the shipping options offered at checkout.
pub struct ShippingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShippingRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active methods in creation order; the first is the default choice.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<ShippingMethod>, RepositoryError> {
        let methods = sqlx::query_as::<_, ShippingMethod>(
            r"
            SELECT id, description, price, delivery_days, active
            FROM shop.shipping_method
            WHERE business_id = $1 AND active
            ORDER BY id
            ",
        )
        .bind(business_id)
        .fetch_all(self.pool)
        .await?;
        Ok(methods)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(
        &self,
        business_id: BusinessId,
        id: ShippingMethodId,
    ) -> Result<Option<ShippingMethod>, RepositoryError> {
        let method = sqlx::query_as::<_, ShippingMethod>(
            r"
            SELECT id, description, price, delivery_days, active
            FROM shop.shipping_method
            WHERE business_id = $1 AND id = $2 AND active
            ",
        )
        .bind(business_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(method)
    }
}
