//! Form validation with per-field messages.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use luxe_core::order::MAX_DELIVERY_DAYS;
use luxe_core::settings::try_parse_map_location;

/// Messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Take over every message from `other`.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns the collected messages as a `ValidationError`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields: self })
        }
    }
}

/// One or more fields failed validation.
#[derive(Debug, Clone, Error)]
#[error("validation failed")]
pub struct ValidationError {
    pub fields: FieldErrors,
}

impl ValidationError {
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::default();
        fields.add(field, message);
        Self { fields }
    }
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn positive(value: Option<Decimal>) -> bool {
    value.is_some_and(|v| v > Decimal::ZERO)
}

/// New product form: name, price and category are required.
///
/// # Errors
///
/// Returns every failing field at once.
pub fn validate_new_product(
    name: Option<&str>,
    price: Option<Decimal>,
    category: Option<&str>,
) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    if blank(name) {
        errors.add("name", "Please enter a product name");
    }
    if !positive(price) {
        errors.add("price", "Please enter a valid price");
    }
    if blank(category) {
        errors.add("category", "Please select a category");
    }
    errors.into_result()
}

/// New category form: both names are required.
///
/// # Errors
///
/// Returns every failing field at once.
pub fn validate_new_category(
    name: Option<&str>,
    display_name: Option<&str>,
) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    if blank(name) {
        errors.add("name", "Please enter a category name");
    }
    if blank(display_name) {
        errors.add("display_name", "Please enter a display name");
    }
    errors.into_result()
}

/// New shipping method form: a description and a positive price.
///
/// # Errors
///
/// Returns every failing field at once.
pub fn validate_new_shipping_method(
    description: Option<&str>,
    price: Option<Decimal>,
    delivery_days: i32,
) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    if blank(description) {
        errors.add("description", "Please enter a description");
    }
    if !positive(price) {
        errors.add("price", "Please enter a valid price");
    }
    if delivery_days < 0 {
        errors.add("delivery_days", "Delivery days cannot be negative");
    } else if let Err(err) = validate_delivery_days(Some(delivery_days)) {
        errors.extend(err.fields);
    }
    errors.into_result()
}

/// Delivery days on an update, when present, must not exceed
/// [`MAX_DELIVERY_DAYS`].
///
/// # Errors
///
/// Returns a `delivery_days` error for longer promises.
pub fn validate_delivery_days(delivery_days: Option<i32>) -> Result<(), ValidationError> {
    match delivery_days {
        Some(days) if days > MAX_DELIVERY_DAYS => Err(ValidationError::single(
            "delivery_days",
            format!("Delivery days cannot exceed {MAX_DELIVERY_DAYS}"),
        )),
        _ => Ok(()),
    }
}

/// Price on an update, when present, must be positive.
///
/// # Errors
///
/// Returns a `price` error for zero or negative values.
pub fn validate_price_update(price: Option<Decimal>) -> Result<(), ValidationError> {
    match price {
        Some(p) if p <= Decimal::ZERO => {
            Err(ValidationError::single("price", "Please enter a valid price"))
        }
        _ => Ok(()),
    }
}

/// Business name that yields a usable media folder once whitespace is
/// removed: not blank, no path separators or control characters, and not
/// starting with a dot.
///
/// # Errors
///
/// Returns a `business_name` error otherwise.
pub fn validate_business_name(value: &str) -> Result<(), ValidationError> {
    let folder: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if folder.is_empty() {
        return Err(ValidationError::single(
            "business_name",
            "Please enter a business name",
        ));
    }
    if folder.starts_with('.')
        || folder.contains(['/', '\\'])
        || folder.chars().any(char::is_control)
    {
        return Err(ValidationError::single(
            "business_name",
            "Business name cannot contain slashes or start with a dot",
        ));
    }
    Ok(())
}

/// Map location in `lat, lng` form with coordinates in range.
///
/// # Errors
///
/// Returns a `map_location` error otherwise.
pub fn validate_map_location(value: &str) -> Result<(), ValidationError> {
    try_parse_map_location(value).map(|_| ()).ok_or_else(|| {
        ValidationError::single(
            "map_location",
            "Map location must be formatted as \"latitude, longitude\"",
        )
    })
}
