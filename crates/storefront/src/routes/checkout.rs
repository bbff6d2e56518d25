//! Checkout route handlers.
//!
//! The browser runs the payment widget with the client id from
//! `/api/checkout/options`, then reports the approved payment to
//! `/api/checkout/complete`.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use luxe_core::cart::CartTotals;
use luxe_core::order::ShippingMethod;
use luxe_core::{OrderId, ShippingMethodId};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::services::checkout::{CheckoutService, CompleteCheckout};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutOptions {
    pub paypal_client_id: String,
    pub shipping_methods: Vec<ShippingMethod>,
    /// First active method, preselected in the form.
    pub default_shipping_method_id: Option<ShippingMethodId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub shipping_method_id: Option<ShippingMethodId>,
}

#[derive(Debug, Serialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub totals: CartTotals,
}

/// Payment client id and shipping choices.
///
/// GET /api/checkout/options
#[instrument(skip(state, session))]
pub async fn options(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CheckoutOptions>> {
    let settings = state.settings().await;
    let shipping_methods = CheckoutService::new(&state, &session, None)
        .shipping_methods()
        .await?;
    Ok(Json(CheckoutOptions {
        paypal_client_id: settings.paypal_client_id,
        default_shipping_method_id: shipping_methods.first().map(|m| m.id),
        shipping_methods,
    }))
}

/// Totals for the current cart and shipping choice.
///
/// POST /api/checkout/quote
#[instrument(skip(state, session, user))]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<CartTotals>> {
    let totals = CheckoutService::new(&state, &session, user.0.as_ref())
        .quote(body.shipping_method_id)
        .await?;
    Ok(Json(totals))
}

/// Record an approved payment as an order.
///
/// POST /api/checkout/complete
#[instrument(skip(state, session, user, body), fields(payment_order_id = %body.payment_order_id))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Json(body): Json<CompleteCheckout>,
) -> Result<(StatusCode, Json<OrderPlaced>)> {
    let placed = CheckoutService::new(&state, &session, user.0.as_ref())
        .complete(&body)
        .await?;
    let order_id = placed.order_id.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order_id.as_str())]),
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderPlaced {
            order_id: placed.order_id,
            totals: placed.totals,
        }),
    ))
}
