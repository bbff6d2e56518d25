//! Product and category queries.
//!
//! The storefront only ever sees active rows for its own business.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use luxe_core::catalog::{Category, Product};
use luxe_core::{BusinessId, ProductId};

use super::RepositoryError;

/// Column list matching [`Product`]. `in_stock` is derived from the stock count.
macro_rules! product_columns {
    () => {
        "id, name, category, price, image_url, description, material, dimensions, \
         stock_quantity, stock_quantity > 0 AS in_stock, rating, reviews, taxes, active"
    };
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All active products in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(&self, business_id: BusinessId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(concat!(
            "SELECT ",
            product_columns!(),
            " FROM shop.product WHERE business_id = $1 AND active ORDER BY id"
        ))
        .bind(business_id)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// One active product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(
        &self,
        business_id: BusinessId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(concat!(
            "SELECT ",
            product_columns!(),
            " FROM shop.product WHERE business_id = $1 AND id = $2 AND active"
        ))
        .bind(business_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Tax rates for the given products. Missing products are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn tax_rates(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Decimal>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let rows = sqlx::query_as::<_, (ProductId, Decimal)>(
            "SELECT id, taxes FROM shop.product WHERE id = ANY($1)",
        )
        .bind(raw)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Active categories, by display name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, display_name, category_code, active
            FROM shop.category
            WHERE business_id = $1 AND active
            ORDER BY display_name
            ",
        )
        .bind(business_id)
        .fetch_all(self.pool)
        .await?;
        Ok(categories)
    }
}
