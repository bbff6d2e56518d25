//! Catalog types plus the shop page's filtering and sorting rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ProductId};

/// Number of products shown in the home page's featured strip.
pub const FEATURED_COUNT: usize = 3;

/// Number of related products shown on a product detail page.
pub const RELATED_COUNT: usize = 3;

/// Quantity bounds on the product detail page.
pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 10;

/// Default upper bound of the shop's price slider.
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// A product as sold in the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Category name, e.g. `bag`.
    pub category: String,
    pub price: Decimal,
    pub image_url: String,
    pub description: String,
    pub material: String,
    pub dimensions: Option<String>,
    pub stock_quantity: i32,
    pub in_stock: bool,
    pub rating: Decimal,
    pub reviews: i32,
    /// Tax rate in percent.
    pub taxes: Decimal,
    pub active: bool,
}

/// A product category managed from the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Category {
    pub id: CategoryId,
    /// Machine name stored on products, e.g. `watch`.
    pub name: String,
    /// Label shown to shoppers, e.g. `Watches`.
    pub display_name: String,
    pub category_code: i32,
    pub active: bool,
}

/// A price bucket offered as a quick filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub label: &'static str,
    pub min: Decimal,
    /// `None` means unbounded.
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Whether `price` falls in `[min, max)`.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price < max)
    }
}

const fn dollars(amount: u32) -> Decimal {
    Decimal::from_parts(amount, 0, 0, false, 0)
}

/// The shop's price buckets.
pub const PRICE_RANGES: [PriceRange; 4] = [
    PriceRange {
        label: "Under $500",
        min: dollars(0),
        max: Some(dollars(500)),
    },
    PriceRange {
        label: "$500 - $1,000",
        min: dollars(500),
        max: Some(dollars(1000)),
    },
    PriceRange {
        label: "$1,000 - $2,000",
        min: dollars(1000),
        max: Some(dollars(2000)),
    },
    PriceRange {
        label: "Over $2,000",
        min: dollars(2000),
        max: None,
    },
];

/// Sort order of the shop listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortOrder {
    /// Parse a query-string value; anything unknown means `Featured`.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            _ => Self::Featured,
        }
    }
}

/// Shop page filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Category name; `None` or `all` shows everything.
    pub category: Option<String>,
    pub max_price: Decimal,
    pub sort: SortOrder,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            max_price: DEFAULT_MAX_PRICE,
            sort: SortOrder::Featured,
        }
    }
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("" | "all") => true,
            Some(category) => product.category == category,
        };
        category_ok && product.price <= self.max_price
    }

    /// Filter then sort. Sorting is stable, so ties keep catalog order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut out: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Featured => {}
            SortOrder::PriceLow => out.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHigh => out.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Rating => out.sort_by(|a, b| b.rating.cmp(&a.rating)),
        }
        out
    }
}

/// The products shown in the featured strip.
#[must_use]
pub fn featured(products: &[Product]) -> Vec<Product> {
    products.iter().take(FEATURED_COUNT).cloned().collect()
}

/// Products in the same category as `product`, excluding it.
#[must_use]
pub fn related(product: &Product, catalog: &[Product]) -> Vec<Product> {
    catalog
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(RELATED_COUNT)
        .cloned()
        .collect()
}

/// Clamp a requested quantity into the detail page's allowed range.
#[must_use]
pub fn clamp_quantity(quantity: i32) -> i32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(id: i32, name: &str, category: &str, cents: i64, rating: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            category: category.to_owned(),
            price: Decimal::new(cents, 2),
            image_url: format!("/media/luxe/{id}/cover.jpg"),
            description: String::new(),
            material: "Leather".to_owned(),
            dimensions: None,
            stock_quantity: 5,
            in_stock: true,
            rating: Decimal::new(rating, 1),
            reviews: 10,
            taxes: Decimal::ZERO,
            active: true,
        }
    }

    pub fn catalog() -> Vec<Product> {
        vec![
            product(1, "Classic Leather Tote", "bag", 129_999, 48),
            product(2, "Silk Luxury Scarf", "scarf", 44_999, 47),
            product(3, "Chronograph Watch", "watch", 249_999, 49),
            product(4, "Crossbody Bag", "bag", 89_999, 46),
            product(5, "Cashmere Wrap", "scarf", 89_999, 48),
            product(6, "Dress Watch", "watch", 189_999, 47),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::fixtures::catalog;
    use super::*;

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_default_filter_keeps_catalog_order() {
        let out = ProductFilter::default().apply(&catalog());
        assert_eq!(ids(&out), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_category_filter() {
        let filter = ProductFilter {
            category: Some("watch".to_owned()),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&filter.apply(&catalog())), vec![3, 6]);

        let all = ProductFilter {
            category: Some("all".to_owned()),
            ..ProductFilter::default()
        };
        assert_eq!(all.apply(&catalog()).len(), 6);
    }

    #[test]
    fn test_max_price_is_inclusive() {
        let filter = ProductFilter {
            max_price: Decimal::new(89_999, 2),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&filter.apply(&catalog())), vec![2, 4, 5]);
    }

    #[test]
    fn test_sorting() {
        let mut filter = ProductFilter {
            sort: SortOrder::PriceLow,
            ..ProductFilter::default()
        };
        assert_eq!(ids(&filter.apply(&catalog())), vec![2, 4, 5, 1, 6, 3]);

        filter.sort = SortOrder::PriceHigh;
        assert_eq!(ids(&filter.apply(&catalog())), vec![3, 6, 1, 4, 5, 2]);

        filter.sort = SortOrder::Rating;
        assert_eq!(ids(&filter.apply(&catalog())), vec![3, 1, 5, 2, 6, 4]);
    }

    #[test]
    fn test_sort_parse_lenient() {
        assert_eq!(SortOrder::parse_lenient("price-high"), SortOrder::PriceHigh);
        assert_eq!(SortOrder::parse_lenient("newest"), SortOrder::Featured);
    }

    #[test]
    fn test_featured_and_related() {
        let catalog = catalog();
        assert_eq!(ids(&featured(&catalog)), vec![1, 2, 3]);
        let tote = catalog.first().unwrap();
        assert_eq!(ids(&related(tote, &catalog)), vec![4]);
    }

    #[test]
    fn test_price_ranges() {
        let under = PRICE_RANGES[0];
        assert!(under.contains(Decimal::new(44_999, 2)));
        assert!(!under.contains(Decimal::new(500, 0)));
        let over = PRICE_RANGES[3];
        assert!(over.contains(Decimal::new(1_000_000, 0)));
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(4), 4);
        assert_eq!(clamp_quantity(99), 10);
    }
}
