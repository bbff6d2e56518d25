//! Cart route handlers.
//!
//! The cart is kept in the session; signed-in customers' changes are
//! mirrored to the database by `CartService`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use luxe_core::ProductId;
use luxe_core::cart::{Cart, CartItem};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Cart contents and totals before shipping.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub item_count: i32,
    /// Name of the product just added, for the confirmation toast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_added: Option<String>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            subtotal: cart.subtotal(),
            tax: cart.tax(),
            item_count: cart.item_count(),
            items: cart.into_items(),
            last_added: None,
        }
    }
}

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub quantity: Option<i32>,
}

/// Quantity update request.
#[derive(Debug, Deserialize)]
pub struct UpdateItem {
    pub quantity: i32,
}

pub(crate) fn service<'a>(
    state: &'a AppState,
    session: &'a Session,
    user: &OptionalAuth,
) -> CartService<'a> {
    CartService::new(
        state.pool(),
        session,
        state.business_id(),
        user.0.as_ref().map(|u| u.id),
    )
}

/// Current cart.
///
/// GET /api/cart
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
) -> Result<Json<CartResponse>> {
    let cart = service(&state, &session, &user).load().await?;
    Ok(Json(cart.into()))
}

/// Add a product.
///
/// POST /api/cart/items
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Json(body): Json<AddItem>,
) -> Result<Json<CartResponse>> {
    let added = service(&state, &session, &user)
        .add(body.product_id, body.quantity.unwrap_or(1))
        .await?;
    let product_id = body.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    let mut response = CartResponse::from(added.cart);
    response.last_added = Some(added.name);
    Ok(Json(response))
}

/// Change a line's quantity; zero or less removes it.
///
/// PATCH /api/cart/items/{product_id}
#[instrument(skip(state, session, user))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateItem>,
) -> Result<Json<CartResponse>> {
    let cart = service(&state, &session, &user)
        .update_quantity(product_id, body.quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// Remove a line.
///
/// DELETE /api/cart/items/{product_id}
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>> {
    let cart = service(&state, &session, &user).remove(product_id).await?;
    Ok(Json(cart.into()))
}

/// Empty the cart.
///
/// DELETE /api/cart
#[instrument(skip(state, session, user))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
) -> Result<StatusCode> {
    service(&state, &session, &user).clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_response_totals() {
        let cart = Cart::new(vec![CartItem {
            product_id: ProductId::new(1),
            name: "Tote".to_owned(),
            category: "bag".to_owned(),
            price: Decimal::new(25_000, 2),
            image_url: String::new(),
            quantity: 2,
            taxes: Some(Decimal::from(13)),
        }]);
        let response = CartResponse::from(cart);
        assert_eq!(response.subtotal, Decimal::new(50_000, 2));
        assert_eq!(response.tax, Decimal::new(6_500, 2));
        assert_eq!(response.item_count, 2);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("last_added").is_none());
    }
}
