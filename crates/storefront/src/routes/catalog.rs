//! Catalog route handlers: settings, categories, products.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use luxe_core::ProductId;
use luxe_core::catalog::{
    Category, DEFAULT_MAX_PRICE, PRICE_RANGES, PriceRange, Product, ProductFilter, SortOrder,
    featured, related,
};
use luxe_core::settings::BusinessSettings;

use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Shop listing query.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
}

impl ProductQuery {
    /// Build the filter. A blank `max_price` means the default ceiling.
    fn filter(self) -> Result<ProductFilter> {
        let max_price = match self.max_price.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_MAX_PRICE,
            Some(raw) => raw
                .parse::<Decimal>()
                .map_err(|_| AppError::BadRequest("max_price must be a number".to_owned()))?,
        };
        Ok(ProductFilter {
            category: self.category,
            max_price,
            sort: self
                .sort
                .as_deref()
                .map_or(SortOrder::Featured, SortOrder::parse_lenient),
        })
    }
}

/// Product detail with its related products.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub related: Vec<Product>,
}

/// Public business settings.
///
/// GET /api/settings
#[instrument(skip(state))]
pub async fn settings(State(state): State<AppState>) -> Json<BusinessSettings> {
    Json(state.settings().await)
}

/// Active categories.
///
/// GET /api/categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CatalogRepository::new(state.pool())
        .list_categories(state.business_id())
        .await?;
    Ok(Json(categories))
}

/// Quick price filters.
///
/// GET /api/price-ranges
pub async fn price_ranges() -> Json<[PriceRange; 4]> {
    Json(PRICE_RANGES)
}

/// Filtered, sorted product listing.
///
/// GET /api/products?category=&max_price=&sort=
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = query.filter()?;
    let products = CatalogRepository::new(state.pool())
        .list_products(state.business_id())
        .await?;
    Ok(Json(filter.apply(&products)))
}

/// Home page featured strip.
///
/// GET /api/products/featured
#[instrument(skip(state))]
pub async fn featured_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogRepository::new(state.pool())
        .list_products(state.business_id())
        .await?;
    Ok(Json(featured(&products)))
}

/// Product detail.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let repo = CatalogRepository::new(state.pool());
    let product = repo
        .get_product(state.business_id(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;
    let catalog = repo.list_products(state.business_id()).await?;
    let related = related(&product, &catalog);
    Ok(Json(ProductDetail { product, related }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let filter = ProductQuery::default().filter().unwrap();
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn test_query_parses_price_and_sort() {
        let filter = ProductQuery {
            category: Some("watch".to_owned()),
            max_price: Some("1500".to_owned()),
            sort: Some("price-high".to_owned()),
        }
        .filter()
        .unwrap();
        assert_eq!(filter.max_price, Decimal::from(1500));
        assert_eq!(filter.sort, SortOrder::PriceHigh);
        assert_eq!(filter.category.as_deref(), Some("watch"));
    }

    #[test]
    fn test_query_rejects_bad_price() {
        let result = ProductQuery {
            max_price: Some("cheap".to_owned()),
            ..ProductQuery::default()
        }
        .filter();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
