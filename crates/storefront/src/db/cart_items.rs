//! Server-side mirror of signed-in customers' carts.
//!
//! One row per (profile, product). Every statement here is a best-effort
//! mirror of a session mutation; callers log and drop failures.

use sqlx::PgPool;

use luxe_core::cart::{CartItem, MAX_LINE_QUANTITY};
use luxe_core::{ProductId, ProfileId};

use super::RepositoryError;

/// Repository for `shop.cart_item`.
pub struct CartItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartItemRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The stored cart, joined with current product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, profile_id: ProfileId) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(
            r"
            SELECT p.id AS product_id, p.name, p.category, p.price, p.image_url,
                   ci.quantity, p.taxes
            FROM shop.cart_item ci
            JOIN shop.product p ON p.id = ci.product_id
            WHERE ci.profile_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(profile_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Increment the stored quantity, inserting the row when absent. The
    /// total stops at [`MAX_LINE_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn add_quantity(
        &self,
        profile_id: ProfileId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop.cart_item (profile_id, product_id, quantity)
            VALUES ($1, $2, LEAST($3, $4))
            ON CONFLICT (profile_id, product_id)
            DO UPDATE SET quantity = LEAST(shop.cart_item.quantity::bigint + EXCLUDED.quantity, $4)
            ",
        )
        .bind(profile_id)
        .bind(product_id)
        .bind(quantity)
        .bind(MAX_LINE_QUANTITY)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Overwrite the stored quantity of an existing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn set_quantity(
        &self,
        profile_id: ProfileId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE shop.cart_item SET quantity = $3 WHERE profile_id = $1 AND product_id = $2",
        )
        .bind(profile_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove(
        &self,
        profile_id: ProfileId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.cart_item WHERE profile_id = $1 AND product_id = $2")
            .bind(profile_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn clear(&self, profile_id: ProfileId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.cart_item WHERE profile_id = $1")
            .bind(profile_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
