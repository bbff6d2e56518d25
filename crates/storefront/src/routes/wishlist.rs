//! Wishlist route handlers. The wishlist lives only in the session.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use luxe_core::ProductId;
use luxe_core::wishlist::{Wishlist, WishlistItem};

use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::session_keys;
use crate::routes::cart::{CartResponse, service};
use crate::state::AppState;

/// Save-for-later request.
#[derive(Debug, Deserialize)]
pub struct SaveItem {
    pub product_id: ProductId,
}

/// Move-to-cart request.
#[derive(Debug, Default, Deserialize)]
pub struct MoveToCart {
    #[serde(default)]
    pub quantity: Option<i32>,
}

async fn load(session: &Session) -> Result<Wishlist> {
    Ok(session
        .get::<Wishlist>(session_keys::WISHLIST)
        .await?
        .unwrap_or_default())
}

async fn save(session: &Session, wishlist: &Wishlist) -> Result<()> {
    session.insert(session_keys::WISHLIST, wishlist).await?;
    Ok(())
}

/// Saved items.
///
/// GET /api/wishlist
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<Wishlist>> {
    Ok(Json(load(&session).await?))
}

/// Save a product. Saving it twice is a no-op.
///
/// POST /api/wishlist/items
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SaveItem>,
) -> Result<Json<Wishlist>> {
    let product = CatalogRepository::new(state.pool())
        .get_product(state.business_id(), body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", body.product_id)))?;

    let mut wishlist = load(&session).await?;
    if wishlist.add(WishlistItem::from(&product)) {
        save(&session, &wishlist).await?;
    }
    Ok(Json(wishlist))
}

/// Forget a product.
///
/// DELETE /api/wishlist/items/{product_id}
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Wishlist>> {
    let mut wishlist = load(&session).await?;
    if wishlist.remove(product_id) {
        save(&session, &wishlist).await?;
    }
    Ok(Json(wishlist))
}

/// Add a saved product to the cart. It stays in the wishlist.
///
/// POST /api/wishlist/items/{product_id}/cart
#[instrument(skip(state, session, user))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Path(product_id): Path<ProductId>,
    body: Option<Json<MoveToCart>>,
) -> Result<Json<CartResponse>> {
    if !load(&session).await?.contains(product_id) {
        return Err(AppError::NotFound(format!(
            "Product {product_id} is not in your wishlist"
        )));
    }
    let quantity = body.and_then(|Json(b)| b.quantity).unwrap_or(1);
    let added = service(&state, &session, &user)
        .add(product_id, quantity)
        .await?;

    let mut response = CartResponse::from(added.cart);
    response.last_added = Some(added.name);
    Ok(Json(response))
}
