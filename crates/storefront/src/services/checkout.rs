//! Checkout: shipping quotes and recording an order after payment approval.
//!
//! The payment widget captures the payment in the browser. Completion only
//! records what the widget reported; the payment is not re-verified here.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tower_sessions::Session;
use tracing::{info, warn};

use luxe_core::cart::{Cart, CartTotals};
use luxe_core::order::{ShippingAddress, ShippingMethod, estimated_delivery, format_address};
use luxe_core::{Email, OrderId, OrderStatus, ShippingMethodId};

use crate::db::RepositoryError;
use crate::db::orders::{NewOrder, NewOrderItem, OrderRepository};
use crate::db::shipping::ShippingRepository;
use crate::models::CurrentUser;
use crate::services::cart::{CartError, CartService};
use crate::services::email::OrderNotification;
use crate::state::AppState;

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid buyer email: {0}")]
    InvalidBuyerEmail(#[from] luxe_core::EmailError),

    #[error("payment order id is required")]
    MissingPaymentOrderId,

    #[error("unknown shipping method {0}")]
    UnknownShippingMethod(ShippingMethodId),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// What the payment widget reports on approval.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteCheckout {
    pub payment_order_id: String,
    pub buyer_email: String,
    /// Payer's given name and surname.
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub shipping_method_id: Option<ShippingMethodId>,
}

/// A recorded order.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub totals: CartTotals,
}

/// Totals for a cart with an optional shipping method.
#[must_use]
pub fn quote(cart: &Cart, method: Option<&ShippingMethod>) -> CartTotals {
    cart.totals(method.map_or(Decimal::ZERO, |m| m.price))
}

/// Checkout for one request.
pub struct CheckoutService<'a> {
    state: &'a AppState,
    session: &'a Session,
    user: Option<&'a CurrentUser>,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(
        state: &'a AppState,
        session: &'a Session,
        user: Option<&'a CurrentUser>,
    ) -> Self {
        Self {
            state,
            session,
            user,
        }
    }

    fn carts(&self) -> CartService<'a> {
        CartService::new(
            self.state.pool(),
            self.session,
            self.state.business_id(),
            self.user.map(|u| u.id),
        )
    }

    /// Active shipping methods; the first is the default selection.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn shipping_methods(&self) -> Result<Vec<ShippingMethod>, CheckoutError> {
        Ok(ShippingRepository::new(self.state.pool())
            .list_active(self.state.business_id())
            .await?)
    }

    /// Totals for the current cart. An unknown method is quoted as free
    /// shipping.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Cart` if the cart cannot be loaded.
    pub async fn quote(
        &self,
        shipping_method_id: Option<ShippingMethodId>,
    ) -> Result<CartTotals, CheckoutError> {
        let cart = self.carts().load().await?;
        let method = match shipping_method_id {
            Some(id) => ShippingRepository::new(self.state.pool())
                .get_active(self.state.business_id(), id)
                .await?,
            None => None,
        };
        Ok(quote(&cart, method.as_ref()))
    }

    /// Record the approved order, notify the business and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to buy.
    /// Returns `CheckoutError::UnknownShippingMethod` if the chosen method is
    /// not active for the business.
    /// Returns `CheckoutError::Repository` if the order cannot be written.
    pub async fn complete(&self, request: &CompleteCheckout) -> Result<PlacedOrder, CheckoutError> {
        let carts = self.carts();
        let cart = carts.load().await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let payment_order_id = request.payment_order_id.trim();
        if payment_order_id.is_empty() {
            return Err(CheckoutError::MissingPaymentOrderId);
        }
        let buyer_email = Email::parse(&request.buyer_email)?;

        let method = match request.shipping_method_id {
            Some(id) => Some(
                ShippingRepository::new(self.state.pool())
                    .get_active(self.state.business_id(), id)
                    .await?
                    .ok_or(CheckoutError::UnknownShippingMethod(id))?,
            ),
            None => None,
        };

        let settings = self.state.settings().await;
        let totals = quote(&cart, method.as_ref());
        let shipping_address = format_address(request.shipping_address.as_ref());
        let shipping_description = method
            .as_ref()
            .map(|m| m.description.clone())
            .unwrap_or_default();
        let delivery_days = method.as_ref().map_or(0, |m| m.delivery_days);

        let order = NewOrder {
            business_id: self.state.business_id(),
            user_id: self.user.map(|u| u.id),
            total_amount: totals.grand_total,
            status: OrderStatus::Paid,
            payment_order_id: payment_order_id.to_owned(),
            shipping_address,
            shipping_method: shipping_description,
            estimated_delivery: Some(estimated_delivery(Utc::now(), delivery_days)),
            buyer_email: buyer_email.as_str().to_owned(),
            business_email: settings.email.clone(),
        };
        let items: Vec<NewOrderItem> = cart
            .items()
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id,
                product_name: item.name.clone(),
                quantity: item.quantity,
                price: item.price,
                item_total: item.line_total(),
            })
            .collect();

        let (created, _) = OrderRepository::new(self.state.pool())
            .create(&order, &items)
            .await?;
        info!(order_id = %created.id, total = %created.total_amount, "Order placed");

        self.notify(&settings.email, &created.id, request, &order, &cart, &totals)
            .await;

        carts.clear().await?;

        Ok(PlacedOrder {
            order_id: created.id,
            totals,
        })
    }

    async fn notify(
        &self,
        business_email: &str,
        order_id: &OrderId,
        request: &CompleteCheckout,
        order: &NewOrder,
        cart: &Cart,
        totals: &CartTotals,
    ) {
        let Some(mailer) = self.state.email() else {
            warn!(order_id = %order_id, "Email disabled, skipping order notification");
            return;
        };
        let notification = OrderNotification {
            order_id: *order_id,
            buyer_name: request.buyer_name.as_deref().unwrap_or_default(),
            buyer_email: &order.buyer_email,
            shipping_method: &order.shipping_method,
            shipping_address: &order.shipping_address,
            cart,
            totals,
        };
        if let Err(e) = mailer
            .send_order_notification(business_email, &notification)
            .await
        {
            warn!(error = %e, order_id = %order_id, "Failed to send order notification");
        }
    }
}
