//! Transactional mail: order notifications and contact form messages.
//!
//! Uses SMTP via lettre with Askama plain text templates. Both messages go to
//! the business address from settings.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use luxe_core::cart::{Cart, CartTotals};
use luxe_core::{OrderId, format_usd};

use crate::config::EmailConfig;

/// One rendered line of the order notification.
struct OrderLine {
    name: String,
    quantity: i32,
    total: String,
}

/// Plain text body of the new-order notification.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    order_number: OrderId,
    buyer_name: &'a str,
    buyer_email: &'a str,
    shipping_method: &'a str,
    shipping_address: &'a str,
    lines: Vec<OrderLine>,
    subtotal: String,
    /// Omitted from the message when no tax was charged.
    tax: Option<String>,
    shipping: String,
    grand_total: String,
}

/// Plain text body of a contact form message.
#[derive(Template)]
#[template(path = "email/contact_message.txt")]
struct ContactMessageText<'a> {
    business_name: &'a str,
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Errors that can occur when sending mail.
#[derive(Debug, Error)]
pub enum MailError {
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

/// Everything the order notification needs to know about a placed order.
#[derive(Debug, Clone, Copy)]
pub struct OrderNotification<'a> {
    pub order_id: OrderId,
    pub buyer_name: &'a str,
    pub buyer_email: &'a str,
    pub shipping_method: &'a str,
    pub shipping_address: &'a str,
    pub cart: &'a Cart,
    pub totals: &'a CartTotals,
}

/// A contact form submission.
#[derive(Debug, Clone, Copy)]
pub struct ContactMessage<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
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
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
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

    /// Notify the business of a new order, with reply-to set to the buyer.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or the template fails to render.
    pub async fn send_order_notification(
        &self,
        to: &str,
        order: &OrderNotification<'_>,
    ) -> Result<(), MailError> {
        let body = render_order_notification(order)?;
        let subject = format!("New Order #{}", order.order_id);
        let reply_to = (!order.buyer_email.is_empty()).then_some(order.buyer_email);
        self.send_text_email(to, reply_to, &subject, body).await
    }

    /// Forward a contact form message to the business.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or the template fails to render.
    pub async fn send_contact_message(
        &self,
        to: &str,
        business_name: &str,
        message: &ContactMessage<'_>,
    ) -> Result<(), MailError> {
        let body = ContactMessageText {
            business_name,
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
        }
        .render()?;
        let subject = format!("Contact: {}", message.subject);
        self.send_text_email(to, Some(message.email), &subject, body)
            .await
    }

    async fn send_text_email(
        &self,
        to: &str,
        reply_to: Option<&str>,
        subject: &str,
        body: String,
    ) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }
        let email = builder.body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_owned()))
}

fn render_order_notification(order: &OrderNotification<'_>) -> Result<String, MailError> {
    let lines = order
        .cart
        .items()
        .iter()
        .map(|item| OrderLine {
            name: item.name.clone(),
            quantity: item.quantity,
            total: format_usd(item.line_total()),
        })
        .collect();
    let totals = order.totals;

    let text = OrderNotificationText {
        order_number: order.order_id,
        buyer_name: order.buyer_name,
        buyer_email: order.buyer_email,
        shipping_method: order.shipping_method,
        shipping_address: order.shipping_address,
        lines,
        subtotal: format_usd(totals.subtotal),
        tax: (totals.tax > rust_decimal::Decimal::ZERO).then(|| format_usd(totals.tax)),
        shipping: format_usd(totals.shipping),
        grand_total: format_usd(totals.grand_total),
    }
    .render()?;
    Ok(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use luxe_core::ProductId;
    use luxe_core::cart::CartItem;

    use super::*;

    fn cart() -> Cart {
        Cart::new(vec![CartItem {
            product_id: ProductId::new(1),
            name: "Classic Leather Tote".to_owned(),
            category: "bag".to_owned(),
            price: Decimal::new(129_999, 2),
            image_url: String::new(),
            quantity: 2,
            taxes: Some(Decimal::ZERO),
        }])
    }

    #[test]
    fn test_order_notification_body() {
        let cart = cart();
        let totals = cart.totals(Decimal::new(1_500, 2));
        let body = render_order_notification(&OrderNotification {
            order_id: OrderId::new(42),
            buyer_name: "Ana Mora",
            buyer_email: "ana@example.com",
            shipping_method: "Express",
            shipping_address: "1 Main St, San Jose, SJ 10101",
            cart: &cart,
            totals: &totals,
        })
        .unwrap();

        assert!(body.starts_with("Order Number: 42"));
        assert!(body.contains("Classic Leather Tote - Qty: 2 - $2,599.98"));
        assert!(body.contains("Shipping: $15.00"));
        assert!(body.contains("Total: $2,614.98"));
        assert!(!body.contains("Tax:"));
    }

    #[test]
    fn test_order_notification_includes_tax_when_charged() {
        let cart = Cart::new(vec![CartItem {
            taxes: Some(Decimal::from(13)),
            ..cart_item()
        }]);
        let totals = cart.totals(Decimal::ZERO);
        let body = render_order_notification(&OrderNotification {
            order_id: OrderId::new(7),
            buyer_name: "Ana Mora",
            buyer_email: "ana@example.com",
            shipping_method: "",
            shipping_address: "N/A",
            cart: &cart,
            totals: &totals,
        })
        .unwrap();
        assert!(body.contains("Tax: $13.00"));
    }

    fn cart_item() -> CartItem {
        CartItem {
            product_id: ProductId::new(2),
            name: "Scarf".to_owned(),
            category: "scarf".to_owned(),
            price: Decimal::new(10_000, 2),
            image_url: String::new(),
            quantity: 1,
            taxes: None,
        }
    }

    #[test]
    fn test_contact_message_body() {
        let body = ContactMessageText {
            business_name: "Luxe",
            name: "Ana",
            email: "ana@example.com",
            subject: "Sizing",
            message: "Is the tote carry-on size?",
        }
        .render()
        .unwrap();
        assert!(body.contains("Subject: Sizing"));
        assert!(body.trim_end().ends_with("Is the tote carry-on size?"));
    }
}
