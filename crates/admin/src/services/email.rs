//! Email service for back-office password resets.
//!
//! Uses SMTP via lettre with an Askama plain-text template.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rand::Rng;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Subject of the password reset email.
pub const PASSWORD_RESET_SUBJECT: &str = "Password Reset - LUXE Admin";

/// Length of generated temporary passwords.
const TEMPORARY_PASSWORD_LENGTH: usize = 8;

const TEMPORARY_PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Plain text template for the temporary password email.
#[derive(Template)]
#[template(path = "email/temporary_password.txt")]
struct TemporaryPasswordText<'a> {
    business_name: &'a str,
    password: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be set up.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a temporary back-office password to the business address.
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to render or the email fails to send.
    pub async fn send_temporary_password(
        &self,
        to: &str,
        business_name: &str,
        password: &str,
    ) -> Result<(), EmailError> {
        let body = TemporaryPasswordText {
            business_name,
            password,
        }
        .render()?;

        let email = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(to)?)
            .subject(PASSWORD_RESET_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = PASSWORD_RESET_SUBJECT, "Email sent successfully");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_owned()))
}

/// Generate an 8 character lowercase alphanumeric temporary password.
#[must_use]
pub fn generate_temporary_password() -> String {
    let mut rng = rand::rng();
    (0..TEMPORARY_PASSWORD_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..TEMPORARY_PASSWORD_CHARSET.len());
            char::from(TEMPORARY_PASSWORD_CHARSET.get(idx).copied().unwrap_or(b'a'))
        })
        .collect()
}
