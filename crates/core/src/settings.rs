//! Business settings: contact details, map location and payment client id.
//!
//! Every column of the settings row is nullable. Readers never fail on a
//! missing value; they fall back to the shop defaults below.

use serde::{Deserialize, Serialize};

use crate::types::BusinessId;

/// Business id used when none is configured.
pub const DEFAULT_BUSINESS_ID: BusinessId = BusinessId::new(5);

pub const DEFAULT_EMAIL: &str = "info@default.com";
pub const DEFAULT_PHONE: &str = "(555) 123-4567";
pub const DEFAULT_ADDRESS: &str = "123 Calle Example, Ciudad, Estado 12345";
pub const DEFAULT_BUSINESS_NAME: &str = "Luxe";
pub const DEFAULT_LATITUDE: f64 = 10.007_725;
pub const DEFAULT_LONGITUDE: f64 = -84.099_413;

/// The settings row as stored.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct SettingsRow {
    pub id: BusinessId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub business_name: Option<String>,
    /// `"lat, lng"`.
    pub map_location: Option<String>,
    pub paypal_client_id: Option<String>,
    /// Argon2 PHC string for the back-office password.
    pub online_password: Option<String>,
}

impl Default for BusinessId {
    fn default() -> Self {
        DEFAULT_BUSINESS_ID
    }
}

/// Settings with defaults applied. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSettings {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub business_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub paypal_client_id: String,
    /// Whether a back-office password has been configured.
    pub has_password: bool,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_owned(),
            phone: DEFAULT_PHONE.to_owned(),
            address: DEFAULT_ADDRESS.to_owned(),
            business_name: DEFAULT_BUSINESS_NAME.to_owned(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            paypal_client_id: String::new(),
            has_password: false,
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

impl From<SettingsRow> for BusinessSettings {
    fn from(row: SettingsRow) -> Self {
        let (latitude, longitude) = row
            .map_location
            .as_deref()
            .map_or((DEFAULT_LATITUDE, DEFAULT_LONGITUDE), parse_map_location);
        Self {
            email: or_default(row.email, DEFAULT_EMAIL),
            phone: or_default(row.phone, DEFAULT_PHONE),
            address: or_default(row.address, DEFAULT_ADDRESS),
            business_name: or_default(row.business_name, DEFAULT_BUSINESS_NAME),
            latitude,
            longitude,
            paypal_client_id: row.paypal_client_id.unwrap_or_default(),
            has_password: row.online_password.is_some_and(|p| !p.is_empty()),
        }
    }
}

impl BusinessSettings {
    /// Business name with all whitespace removed, used as the media folder.
    #[must_use]
    pub fn storage_folder(&self) -> String {
        self.business_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }
}

/// Parse `"lat, lng"`, returning the default coordinates when either part is
/// missing, not a number, or out of range.
#[must_use]
pub fn parse_map_location(value: &str) -> (f64, f64) {
    try_parse_map_location(value).unwrap_or((DEFAULT_LATITUDE, DEFAULT_LONGITUDE))
}

/// Strict variant used when the back office saves a new location.
#[must_use]
pub fn try_parse_map_location(value: &str) -> Option<(f64, f64)> {
    let (lat, lng) = value.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lng = lng.trim().parse::<f64>().ok()?;
    let valid = lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng);
    valid.then_some((lat, lng))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_row_uses_defaults() {
        let settings = BusinessSettings::from(SettingsRow::default());
        assert_eq!(settings, BusinessSettings::default());
        assert!(!settings.has_password);
    }

    #[test]
    fn test_row_values_win() {
        let row = SettingsRow {
            email: Some("shop@luxe.example".to_owned()),
            business_name: Some("Luxe Boutique".to_owned()),
            map_location: Some("9.93, -84.08".to_owned()),
            online_password: Some("$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_owned()),
            phone: Some("  ".to_owned()),
            ..SettingsRow::default()
        };
        let settings = BusinessSettings::from(row);
        assert_eq!(settings.email, "shop@luxe.example");
        assert_eq!(settings.phone, DEFAULT_PHONE);
        assert_eq!(settings.latitude, 9.93);
        assert_eq!(settings.longitude, -84.08);
        assert!(settings.has_password);
        assert_eq!(settings.storage_folder(), "LuxeBoutique");
    }

    #[test]
    fn test_parse_map_location() {
        assert_eq!(parse_map_location("1.5,2.5"), (1.5, 2.5));
        assert_eq!(
            parse_map_location("not a place"),
            (DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
        );
        assert_eq!(
            parse_map_location("95, 10"),
            (DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
        );
        assert!(try_parse_map_location("10,").is_none());
    }
}
