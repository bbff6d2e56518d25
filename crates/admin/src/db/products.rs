//! Product database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use luxe_core::catalog::Product;
use luxe_core::{BusinessId, ProductId};

use super::{RepositoryError, require_affected};

/// Column list matching [`Product`]. `in_stock` is derived from the stock count.
macro_rules! product_columns {
    () => {
        "id, name, category, price, image_url, description, material, dimensions, \
         stock_quantity, stock_quantity > 0 AS in_stock, rating, reviews, taxes, active"
    };
}

/// A product to insert. Product code, taxes, `active` and `is_service` take
/// their back-office defaults (0, 0, true, false).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    /// Category name.
    pub category: String,
    pub price: Decimal,
    pub image_url: String,
    pub description: String,
    pub material: String,
    pub dimensions: Option<String>,
    pub stock_quantity: i32,
    pub business_email: String,
}

/// Partial product update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub material: Option<String>,
    pub dimensions: Option<String>,
    pub stock_quantity: Option<i32>,
    pub taxes: Option<Decimal>,
    pub active: Option<bool>,
}

/// Every product for the business, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_products(
    pool: &PgPool,
    business_id: BusinessId,
) -> Result<Vec<Product>, RepositoryError> {
    let products = sqlx::query_as::<_, Product>(concat!(
        "SELECT ",
        product_columns!(),
        " FROM shop.product WHERE business_id = $1 ORDER BY id"
    ))
    .bind(business_id)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// One product, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_product(
    pool: &PgPool,
    business_id: BusinessId,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(concat!(
        "SELECT ",
        product_columns!(),
        " FROM shop.product WHERE business_id = $1 AND id = $2"
    ))
    .bind(business_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Insert a product with the back-office defaults.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn create_product(
    pool: &PgPool,
    business_id: BusinessId,
    product: &NewProduct,
) -> Result<Product, RepositoryError> {
    let created = sqlx::query_as::<_, Product>(concat!(
        r"
        INSERT INTO shop.product
            (business_id, product_code, name, category, price, image_url, description,
             material, dimensions, stock_quantity, taxes, business_email, active, is_service)
        VALUES ($1, 0, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10, TRUE, FALSE)
        RETURNING ",
        product_columns!()
    ))
    .bind(business_id)
    .bind(&product.name)
    .bind(&product.category)
    .bind(product.price)
    .bind(&product.image_url)
    .bind(&product.description)
    .bind(&product.material)
    .bind(product.dimensions.as_deref())
    .bind(product.stock_quantity)
    .bind(&product.business_email)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Update a product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product does not belong to
/// the business, or an error if the query fails.
pub async fn update_product(
    pool: &PgPool,
    business_id: BusinessId,
    id: ProductId,
    update: &ProductUpdate,
) -> Result<Product, RepositoryError> {
    sqlx::query_as::<_, Product>(concat!(
        r"
        UPDATE shop.product SET
            name           = COALESCE($3, name),
            category       = COALESCE($4, category),
            price          = COALESCE($5, price),
            image_url      = COALESCE($6, image_url),
            description    = COALESCE($7, description),
            material       = COALESCE($8, material),
            dimensions     = COALESCE($9, dimensions),
            stock_quantity = COALESCE($10, stock_quantity),
            taxes          = COALESCE($11, taxes),
            active         = COALESCE($12, active),
            updated_at     = NOW()
        WHERE business_id = $1 AND id = $2
        RETURNING ",
        product_columns!()
    ))
    .bind(business_id)
    .bind(id)
    .bind(update.name.as_deref())
    .bind(update.category.as_deref())
    .bind(update.price)
    .bind(update.image_url.as_deref())
    .bind(update.description.as_deref())
    .bind(update.material.as_deref())
    .bind(update.dimensions.as_deref())
    .bind(update.stock_quantity)
    .bind(update.taxes)
    .bind(update.active)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Delete a product. Cart rows cascade; order lines keep their snapshot.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if nothing was deleted.
pub async fn delete_product(
    pool: &PgPool,
    business_id: BusinessId,
    id: ProductId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM shop.product WHERE business_id = $1 AND id = $2")
        .bind(business_id)
        .bind(id)
        .execute(pool)
        .await?;
    require_affected(result.rows_affected())
}
