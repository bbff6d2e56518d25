//! Business settings.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use luxe_core::Email;
use luxe_core::settings::BusinessSettings;

use crate::db::settings::{SettingsUpdate, update_settings};
use crate::error::Result;
use crate::services::auth::hash_password;
use crate::services::validation::{FieldErrors, validate_business_name, validate_map_location};
use crate::state::AppState;

/// Settings form. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsForm {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub business_name: Option<String>,
    /// `"lat, lng"`.
    pub map_location: Option<String>,
    pub paypal_client_id: Option<String>,
    pub new_password: Option<String>,
}

impl SettingsForm {
    /// Validate and turn into a database update, hashing any new password.
    fn into_update(self) -> Result<SettingsUpdate> {
        let mut errors = FieldErrors::default();
        let email = match self.email.as_deref().map(str::trim) {
            Some(raw) => match Email::parse(raw) {
                Ok(email) => Some(email.into_inner()),
                Err(_) => {
                    errors.add("email", "Please enter a valid email");
                    None
                }
            },
            None => None,
        };
        let business_name = self.business_name.map(|n| n.trim().to_owned());
        if let Some(name) = business_name.as_deref()
            && let Err(err) = validate_business_name(name)
        {
            errors.extend(err.fields);
        }
        let map_location = self.map_location.map(|m| m.trim().to_owned());
        if let Some(location) = map_location.as_deref()
            && let Err(err) = validate_map_location(location)
        {
            errors.extend(err.fields);
        }
        errors.into_result()?;

        let online_password = self
            .new_password
            .filter(|p| !p.is_empty())
            .map(|p| hash_password(&p))
            .transpose()?;

        Ok(SettingsUpdate {
            email,
            phone: self.phone,
            address: self.address,
            business_name,
            map_location,
            paypal_client_id: self.paypal_client_id,
            online_password,
        })
    }
}

/// Settings with defaults applied. The password hash is never returned.
///
/// GET /api/settings
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<BusinessSettings>> {
    Ok(Json(state.settings().await?))
}

/// Update settings.
///
/// PATCH /api/settings
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Json(form): Json<SettingsForm>,
) -> Result<Json<BusinessSettings>> {
    let changes_password = form.new_password.as_deref().is_some_and(|p| !p.is_empty());
    let update = form.into_update()?;
    let row = update_settings(state.pool(), state.business_id(), &update).await?;
    if changes_password {
        tracing::info!(business_id = %state.business_id(), "Back-office password changed");
    }
    Ok(Json(BusinessSettings::from(row)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_form_rejects_bad_location_and_email() {
        let form = SettingsForm {
            email: Some("nope".to_owned()),
            map_location: Some("north pole".to_owned()),
            ..SettingsForm::default()
        };
        let Err(AppError::Validation(err)) = form.into_update() else {
            panic!("expected validation error");
        };
        assert!(err.fields.get("email").is_some());
        assert!(err.fields.get("map_location").is_some());
    }

    #[test]
    fn test_form_rejects_unusable_business_name() {
        for name in ["   ", "Luxe/Paris"] {
            let form = SettingsForm {
                business_name: Some(name.to_owned()),
                ..SettingsForm::default()
            };
            let Err(AppError::Validation(err)) = form.into_update() else {
                panic!("expected validation error for {name:?}");
            };
            assert!(err.fields.get("business_name").is_some());
        }

        let form = SettingsForm {
            business_name: Some(" Maison Luxe ".to_owned()),
            ..SettingsForm::default()
        };
        let update = form.into_update().unwrap();
        assert_eq!(update.business_name.as_deref(), Some("Maison Luxe"));
    }

    #[test]
    fn test_form_hashes_new_password() {
        let form = SettingsForm {
            map_location: Some(" 9.93, -84.08 ".to_owned()),
            new_password: Some("atelier24".to_owned()),
            ..SettingsForm::default()
        };
        let update = form.into_update().unwrap();
        assert_eq!(update.map_location.as_deref(), Some("9.93, -84.08"));
        assert!(update.online_password.unwrap().starts_with("$argon2id$"));
        assert!(update.email.is_none());
    }

    #[test]
    fn test_form_rejects_short_password() {
        let form = SettingsForm {
            new_password: Some("abc".to_owned()),
            ..SettingsForm::default()
        };
        assert!(matches!(form.into_update(), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_form_rejects_unknown_fields() {
        let parsed: std::result::Result<SettingsForm, _> =
            serde_json::from_str(r#"{"online_password":"x"}"#);
        assert!(parsed.is_err());
    }
}
