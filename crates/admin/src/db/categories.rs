//! Category database operations.

use sqlx::PgPool;

use luxe_core::catalog::Category;
use luxe_core::{BusinessId, CategoryId};

use super::{RepositoryError, require_affected};

/// A category to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub display_name: String,
    pub category_code: i32,
    pub business_email: String,
}

/// Partial category update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub category_code: Option<i32>,
    pub active: Option<bool>,
}

/// All categories for the business, including inactive ones.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_categories(
    pool: &PgPool,
    business_id: BusinessId,
) -> Result<Vec<Category>, RepositoryError> {
    let categories = sqlx::query_as::<_, Category>(
        r"
        SELECT id, name, display_name, category_code, active
        FROM shop.category
        WHERE business_id = $1
        ORDER BY id
        ",
    )
    .bind(business_id)
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Insert an active category.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn create_category(
    pool: &PgPool,
    business_id: BusinessId,
    category: &NewCategory,
) -> Result<Category, RepositoryError> {
    let created = sqlx::query_as::<_, Category>(
        r"
        INSERT INTO shop.category
            (business_id, name, display_name, category_code, business_email, active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING id, name, display_name, category_code, active
        ",
    )
    .bind(business_id)
    .bind(&category.name)
    .bind(&category.display_name)
    .bind(category.category_code)
    .bind(&category.business_email)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Update a category.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the category does not belong to
/// the business, or an error if the query fails.
pub async fn update_category(
    pool: &PgPool,
    business_id: BusinessId,
    id: CategoryId,
    update: &CategoryUpdate,
) -> Result<Category, RepositoryError> {
    sqlx::query_as::<_, Category>(
        r"
        UPDATE shop.category SET
            name          = COALESCE($3, name),
            display_name  = COALESCE($4, display_name),
            category_code = COALESCE($5, category_code),
            active        = COALESCE($6, active)
        WHERE business_id = $1 AND id = $2
        RETURNING id, name, display_name, category_code, active
        ",
    )
    .bind(business_id)
    .bind(id)
    .bind(update.name.as_deref())
    .bind(update.display_name.as_deref())
    .bind(update.category_code)
    .bind(update.active)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Delete a category. Products keep their category name.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if nothing was deleted.
pub async fn delete_category(
    pool: &PgPool,
    business_id: BusinessId,
    id: CategoryId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM shop.category WHERE business_id = $1 AND id = $2")
        .bind(business_id)
        .bind(id)
        .execute(pool)
        .await?;
    require_affected(result.rows_affected())
}
