//! Cart operations over the session, mirrored to the database.
//!
//! The session cart is what the shopper sees. For signed-in customers every
//! change is then copied to `shop.cart_item`; a failed copy is logged and
//! otherwise ignored so the shopper is never blocked by the mirror.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::Session;
use tracing::warn;

use luxe_core::cart::{Cart, CartItem, reconcile};
use luxe_core::catalog::clamp_quantity;
use luxe_core::{BusinessId, ProductId, ProfileId};

use crate::db::RepositoryError;
use crate::db::cart_items::CartItemRepository;
use crate::db::catalog::CatalogRepository;
use crate::models::session_keys;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product does not exist or is not for sale.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Result of adding to the cart.
#[derive(Debug)]
pub struct Added {
    pub cart: Cart,
    /// Name of the product just added, for the confirmation toast.
    pub name: String,
}

/// Cart operations for one request.
pub struct CartService<'a> {
    pool: &'a PgPool,
    session: &'a Session,
    business_id: BusinessId,
    /// Signed-in customer whose server cart mirrors the session.
    profile_id: Option<ProfileId>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        session: &'a Session,
        business_id: BusinessId,
        profile_id: Option<ProfileId>,
    ) -> Self {
        Self {
            pool,
            session,
            business_id,
            profile_id,
        }
    }

    /// The session cart with missing tax rates looked up.
    ///
    /// A failed lookup is logged and the cart is returned as stored; the
    /// rates are tried again on the next load.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` if the session store fails.
    pub async fn load(&self) -> Result<Cart, CartError> {
        let mut cart = self.session_cart().await?;
        let missing = cart.missing_taxes();
        if missing.is_empty() {
            return Ok(cart);
        }
        match CatalogRepository::new(self.pool).tax_rates(&missing).await {
            Ok(rates) => {
                if cart.fill_taxes(&rates) {
                    self.save(&cart).await?;
                }
            }
            Err(e) => warn!(error = %e, "Failed to look up cart tax rates"),
        }
        Ok(cart)
    }

    /// Add a product. The quantity is clamped to the allowed range.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product is unknown or inactive.
    pub async fn add(&self, product_id: ProductId, quantity: i32) -> Result<Added, CartError> {
        let product = CatalogRepository::new(self.pool)
            .get_product(self.business_id, product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;
        let quantity = clamp_quantity(quantity);

        let mut cart = self.load().await?;
        cart.add(CartItem::from_product(&product, quantity));
        self.save(&cart).await?;

        if let Some(profile_id) = self.profile_id
            && let Err(e) = CartItemRepository::new(self.pool)
                .add_quantity(profile_id, product_id, quantity)
                .await
        {
            warn!(error = %e, %product_id, "Failed to mirror cart add");
        }

        Ok(Added {
            cart,
            name: product.name,
        })
    }

    /// Set a line's quantity; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product is not in the cart.
    pub async fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        let mut cart = self.load().await?;
        if !cart.update_quantity(product_id, quantity) {
            return Err(CartError::ProductNotFound(product_id));
        }
        self.save(&cart).await?;

        if let Some(profile_id) = self.profile_id {
            let repo = CartItemRepository::new(self.pool);
            let mirrored = match cart.get(product_id) {
                Some(item) => repo.set_quantity(profile_id, product_id, item.quantity).await,
                None => repo.remove(profile_id, product_id).await,
            };
            if let Err(e) = mirrored {
                warn!(error = %e, %product_id, "Failed to mirror cart update");
            }
        }

        Ok(cart)
    }

    /// Remove a line. Removing an absent product is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` if the session store fails.
    pub async fn remove(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let mut cart = self.load().await?;
        if cart.remove(product_id) {
            self.save(&cart).await?;
        }

        if let Some(profile_id) = self.profile_id
            && let Err(e) = CartItemRepository::new(self.pool)
                .remove(profile_id, product_id)
                .await
        {
            warn!(error = %e, %product_id, "Failed to mirror cart removal");
        }

        Ok(cart)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` if the session store fails.
    pub async fn clear(&self) -> Result<(), CartError> {
        self.save(&Cart::default()).await?;

        if let Some(profile_id) = self.profile_id
            && let Err(e) = CartItemRepository::new(self.pool).clear(profile_id).await
        {
            warn!(error = %e, "Failed to mirror cart clear");
        }
        Ok(())
    }

    /// Adopt the customer's server cart after sign-in when it has items.
    ///
    /// A failed lookup keeps the session cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` if the session store fails.
    pub async fn reconcile_on_login(&self, profile_id: ProfileId) -> Result<Cart, CartError> {
        let local = self.session_cart().await?;
        let server = match CartItemRepository::new(self.pool).list(profile_id).await {
            Ok(items) => Cart::new(items),
            Err(e) => {
                warn!(error = %e, %profile_id, "Failed to load server cart");
                Cart::default()
            }
        };
        let cart = reconcile(local, server);
        self.save(&cart).await?;
        Ok(cart)
    }

    async fn session_cart(&self) -> Result<Cart, CartError> {
        Ok(self
            .session
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartError> {
        self.session.insert(session_keys::CART, cart).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rust_decimal::Decimal;
    use sqlx::postgres::PgPoolOptions;
    use tower_sessions::MemoryStore;

    use super::*;

    // Never connects: these tests only touch paths that skip the database.
    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/luxe_unused")
            .unwrap()
    }

    // Nothing listens on port 1, so every query fails quickly.
    fn dead_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://127.0.0.1:1/luxe_unused")
            .unwrap()
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn item(id: i32, quantity: i32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "bag".to_owned(),
            price: Decimal::new(10_000, 2),
            image_url: String::new(),
            quantity,
            taxes: Some(Decimal::ZERO),
        }
    }

    #[tokio::test]
    async fn test_guest_update_and_remove() {
        let pool = lazy_pool();
        let session = session();
        session
            .insert(session_keys::CART, Cart::new(vec![item(1, 1), item(2, 3)]))
            .await
            .unwrap();
        let service = CartService::new(&pool, &session, BusinessId::new(5), None);

        let cart = service.update_quantity(ProductId::new(1), 4).await.unwrap();
        assert_eq!(cart.item_count(), 7);

        let cart = service.update_quantity(ProductId::new(2), 0).await.unwrap();
        assert_eq!(cart.items().len(), 1);

        assert!(matches!(
            service.update_quantity(ProductId::new(9), 2).await,
            Err(CartError::ProductNotFound(_))
        ));

        let cart = service.remove(ProductId::new(1)).await.unwrap();
        assert!(cart.is_empty());
        assert!(service.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_keeps_wishlist() {
        let pool = lazy_pool();
        let session = session();
        session
            .insert(session_keys::CART, Cart::new(vec![item(1, 2)]))
            .await
            .unwrap();
        session
            .insert(session_keys::WISHLIST, vec![1, 2, 3])
            .await
            .unwrap();

        let service = CartService::new(&pool, &session, BusinessId::new(5), None);
        service.clear().await.unwrap();

        assert!(service.load().await.unwrap().is_empty());
        let wishlist: Option<Vec<i32>> = session.get(session_keys::WISHLIST).await.unwrap();
        assert_eq!(wishlist, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_failed_tax_lookup_keeps_cart() {
        let pool = dead_pool();
        let session = session();
        let mut untaxed = item(1, 2);
        untaxed.taxes = None;
        session
            .insert(session_keys::CART, Cart::new(vec![untaxed.clone()]))
            .await
            .unwrap();
        let service = CartService::new(&pool, &session, BusinessId::new(5), None);

        let cart = service.load().await.unwrap();
        assert_eq!(cart.items(), &[untaxed][..]);

        let cart = service.update_quantity(ProductId::new(1), 3).await.unwrap();
        assert_eq!(cart.item_count(), 3);
    }

    #[tokio::test]
    async fn test_login_keeps_session_cart_when_server_cart_unavailable() {
        let pool = dead_pool();
        let session = session();
        let local = Cart::new(vec![item(1, 2), item(2, 1)]);
        session.insert(session_keys::CART, &local).await.unwrap();
        let service = CartService::new(&pool, &session, BusinessId::new(5), None);

        let cart = service.reconcile_on_login(ProfileId::new(11)).await.unwrap();
        assert_eq!(cart, local);
        assert_eq!(service.load().await.unwrap(), local);
    }

    #[tokio::test]
    async fn test_signed_in_mirror_failures_are_ignored() {
        let pool = dead_pool();
        let session = session();
        session
            .insert(session_keys::CART, Cart::new(vec![item(1, 1), item(2, 1)]))
            .await
            .unwrap();
        let service = CartService::new(
            &pool,
            &session,
            BusinessId::new(5),
            Some(ProfileId::new(11)),
        );

        let cart = service.update_quantity(ProductId::new(1), 5).await.unwrap();
        assert_eq!(cart.item_count(), 6);
        let cart = service.remove(ProductId::new(2)).await.unwrap();
        assert_eq!(cart.item_count(), 5);
        service.clear().await.unwrap();
        assert!(service.load().await.unwrap().is_empty());
    }
}
