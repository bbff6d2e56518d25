//! Contact form route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use luxe_core::Email;

use crate::error::{AppError, Result};
use crate::services::email::ContactMessage;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// All fields are required; the email must be well formed.
    fn validate(&self) -> Result<Email> {
        let missing = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());
        if let Some((field, _)) = missing {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
        Email::parse(&self.email)
            .map_err(|_| AppError::BadRequest("Please enter a valid email address".to_owned()))
    }
}

/// Forward a message to the business, with reply-to set to the visitor.
///
/// POST /api/contact
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<StatusCode> {
    let email = form.validate()?;

    let Some(mailer) = state.email() else {
        tracing::error!("Contact form submitted but email is not configured");
        return Err(AppError::Unavailable(
            "Messaging is temporarily unavailable".to_owned(),
        ));
    };

    let settings = state.settings().await;
    mailer
        .send_contact_message(
            &settings.email,
            &settings.business_name,
            &ContactMessage {
                name: form.name.trim(),
                email: email.as_str(),
                subject: form.subject.trim(),
                message: form.message.trim(),
            },
        )
        .await?;

    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ana".to_owned(),
            email: "Ana@Example.com".to_owned(),
            subject: "Sizing".to_owned(),
            message: "Does the tote fit a laptop?".to_owned(),
        }
    }

    #[test]
    fn test_valid_form() {
        let email = form().validate().ok();
        assert_eq!(email.as_ref().map(Email::as_str), Some("ana@example.com"));
    }

    #[test]
    fn test_missing_field() {
        let result = ContactForm {
            subject: "  ".to_owned(),
            ..form()
        }
        .validate();
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "subject is required"));
    }

    #[test]
    fn test_bad_email() {
        let result = ContactForm {
            email: "not-an-email".to_owned(),
            ..form()
        }
        .validate();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
