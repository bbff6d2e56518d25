//! Seed the catalog from a YAML file.
//!
//! The file is parsed and validated in full before connecting, so a typo
//! never leaves a half-seeded catalog behind. Rows are inserted in the
//! order given: settings, categories, products, shipping methods.
//!
//! ```yaml
//! settings:
//!   business_name: Luxe
//!   email: hello@luxe.shop
//! categories:
//!   - name: watch
//!     display_name: Watches
//! products:
//!   - name: Heritage Chronograph
//!     category: watch
//!     price: "4200.00"
//! shipping_methods:
//!   - description: Express courier
//!     price: "25.00"
//!     delivery_days: 2
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use luxe_admin::db::categories::{NewCategory, create_category};
use luxe_admin::db::products::{NewProduct, create_product};
use luxe_admin::db::settings::{SettingsUpdate, get_settings, update_settings};
use luxe_admin::db::shipping::{NewShippingMethod, create_method};
use luxe_admin::db::{self, RepositoryError};
use luxe_admin::services::validation::{
    ValidationError, validate_business_name, validate_map_location, validate_new_category,
    validate_new_product, validate_new_shipping_method,
};
use luxe_core::Email;
use luxe_core::settings::BusinessSettings;

use super::{CommandError, business_id, database_url};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level catalog file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub settings: Option<SeedSettings>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub shipping_methods: Vec<SeedShippingMethod>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSettings {
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub map_location: Option<String>,
    pub paypal_client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCategory {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub category_code: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedProduct {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub material: String,
    pub dimensions: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedShippingMethod {
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub delivery_days: i32,
}

/// Rows inserted by a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
    pub shipping_methods: usize,
}

/// Every problem in the file, as `section[index].field: message`.
#[must_use]
pub fn validate_catalog(catalog: &CatalogFile) -> Vec<String> {
    fn push(errors: &mut Vec<String>, at: &str, err: &ValidationError) {
        errors.extend(
            err.fields
                .iter()
                .map(|(field, message)| format!("{at}.{field}: {message}")),
        );
    }

    let mut errors = Vec::new();

    if let Some(settings) = &catalog.settings {
        if let Some(email) = settings.email.as_deref()
            && Email::parse(email).is_err()
        {
            errors.push(format!("settings.email: not a valid email: {email}"));
        }
        if let Some(name) = settings.business_name.as_deref()
            && let Err(err) = validate_business_name(name)
        {
            push(&mut errors, "settings", &err);
        }
        if let Some(location) = settings.map_location.as_deref()
            && let Err(err) = validate_map_location(location)
        {
            push(&mut errors, "settings", &err);
        }
    }

    let mut names = HashSet::new();
    for (i, category) in catalog.categories.iter().enumerate() {
        if let Err(err) =
            validate_new_category(Some(&category.name), Some(&category.display_name))
        {
            push(&mut errors, &format!("categories[{i}]"), &err);
        }
        if !names.insert(category.name.trim()) {
            errors.push(format!(
                "categories[{i}].name: duplicate category {}",
                category.name
            ));
        }
    }

    for (i, product) in catalog.products.iter().enumerate() {
        let at = format!("products[{i}]");
        if let Err(err) =
            validate_new_product(Some(&product.name), Some(product.price), Some(&product.category))
        {
            push(&mut errors, &at, &err);
        }
        // Products may also target categories that already exist in the database.
        if !names.is_empty() && !names.contains(product.category.trim()) {
            errors.push(format!(
                "{at}.category: unknown category {}",
                product.category
            ));
        }
        if product.stock_quantity < 0 {
            errors.push(format!("{at}.stock_quantity: cannot be negative"));
        }
    }

    for (i, method) in catalog.shipping_methods.iter().enumerate() {
        if let Err(err) = validate_new_shipping_method(
            Some(&method.description),
            Some(method.price),
            method.delivery_days,
        ) {
            push(&mut errors, &format!("shipping_methods[{i}]"), &err);
        }
    }

    errors
}

/// Seed a catalog file into the configured business.
///
/// # Errors
///
/// Returns an error if the file is missing or invalid, or if any insert
/// fails.
pub async fn catalog(file_path: &str) -> Result<SeedSummary, SeedError> {
    let database_url = database_url()?;
    let business_id = business_id()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::NotFound(file_path.to_owned()));
    }

    info!(path = %file_path, "Loading catalog from file");
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }
    info!(
        categories = catalog.categories.len(),
        products = catalog.products.len(),
        shipping_methods = catalog.shipping_methods.len(),
        "Catalog validated"
    );

    let pool = db::create_pool(&database_url).await?;
    info!(business_id = %business_id, "Connected to database");

    if let Some(settings) = catalog.settings {
        let update = SettingsUpdate {
            email: settings.email.map(|e| e.trim().to_lowercase()),
            phone: settings.phone,
            address: settings.address,
            business_name: settings.business_name,
            map_location: settings.map_location.map(|m| m.trim().to_owned()),
            paypal_client_id: settings.paypal_client_id,
            online_password: None,
        };
        update_settings(&pool, business_id, &update).await?;
        info!("Settings updated");
    }

    // Catalog rows carry the business email current at insert time.
    let business_email = get_settings(&pool, business_id)
        .await?
        .map(BusinessSettings::from)
        .unwrap_or_default()
        .email;

    let mut summary = SeedSummary::default();

    for category in catalog.categories {
        let new = NewCategory {
            name: category.name.trim().to_owned(),
            display_name: category.display_name.trim().to_owned(),
            category_code: category.category_code,
            business_email: business_email.clone(),
        };
        create_category(&pool, business_id, &new).await?;
        summary.categories += 1;
    }

    for product in catalog.products {
        let new = NewProduct {
            name: product.name.trim().to_owned(),
            category: product.category.trim().to_owned(),
            price: product.price,
            image_url: product.image_url,
            description: product.description,
            material: product.material,
            dimensions: product.dimensions,
            stock_quantity: product.stock_quantity,
            business_email: business_email.clone(),
        };
        create_product(&pool, business_id, &new).await?;
        summary.products += 1;
    }

    for method in catalog.shipping_methods {
        let new = NewShippingMethod {
            description: method.description.trim().to_owned(),
            price: method.price,
            delivery_days: method.delivery_days,
        };
        create_method(&pool, business_id, &new).await?;
        summary.shipping_methods += 1;
    }

    info!("Seeding complete!");
    info!("  Categories inserted: {}", summary.categories);
    info!("  Products inserted: {}", summary.products);
    info!("  Shipping methods inserted: {}", summary.shipping_methods);

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DEMO_CATALOG: &str = include_str!("../../../../demos/catalog.yaml");

    #[test]
    fn test_demo_catalog_is_valid() {
        let catalog: CatalogFile = serde_yaml::from_str(DEMO_CATALOG).unwrap();
        assert!(!catalog.categories.is_empty());
        assert!(!catalog.products.is_empty());
        assert!(!catalog.shipping_methods.is_empty());
        assert_eq!(validate_catalog(&catalog), Vec::<String>::new());
    }

    #[test]
    fn test_reports_every_problem() {
        let yaml = r#"
categories:
  - name: watch
    display_name: Watches
  - name: watch
    display_name: ""
products:
  - name: ""
    category: shoes
    price: "0"
shipping_methods:
  - description: Courier
    price: "10.00"
    delivery_days: -1
"#;
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        let errors = validate_catalog(&catalog);
        assert!(errors.contains(&"categories[1].display_name: Please enter a display name".to_owned()));
        assert!(errors.contains(&"categories[1].name: duplicate category watch".to_owned()));
        assert!(errors.contains(&"products[0].name: Please enter a product name".to_owned()));
        assert!(errors.contains(&"products[0].price: Please enter a valid price".to_owned()));
        assert!(errors.contains(&"products[0].category: unknown category shoes".to_owned()));
        assert!(errors.contains(
            &"shipping_methods[0].delivery_days: Delivery days cannot be negative".to_owned()
        ));
    }

    #[test]
    fn test_products_only_file_skips_category_check() {
        let yaml = r#"
products:
  - name: Silk Scarf
    category: accessory
    price: "180.00"
"#;
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let yaml = "product:\n  - name: typo\n";
        assert!(serde_yaml::from_str::<CatalogFile>(yaml).is_err());
    }

    #[test]
    fn test_bad_settings() {
        let yaml =
            "settings:\n  email: nope\n  business_name: Luxe/Paris\n  map_location: somewhere\n";
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.starts_with("settings.business_name:")));
    }
}
