//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness
//! GET    /health/ready                    - Readiness (database)
//!
//! # Catalog
//! GET    /api/settings                    - Public business settings
//! GET    /api/categories                  - Active categories
//! GET    /api/price-ranges                - Quick price filters
//! GET    /api/products                    - Listing (?category=&max_price=&sort=)
//! GET    /api/products/featured           - Featured strip
//! GET    /api/products/{id}               - Detail plus related products
//!
//! # Cart (session, mirrored when signed in)
//! GET    /api/cart
//! DELETE /api/cart
//! POST   /api/cart/items
//! PATCH  /api/cart/items/{product_id}
//! DELETE /api/cart/items/{product_id}
//!
//! # Wishlist (session)
//! GET    /api/wishlist
//! POST   /api/wishlist/items
//! DELETE /api/wishlist/items/{product_id}
//! POST   /api/wishlist/items/{product_id}/cart
//!
//! # Preferences
//! GET    /api/preferences/theme
//! PUT    /api/preferences/theme
//! POST   /api/preferences/theme/toggle
//!
//! # Auth (rate limited)
//! POST   /api/auth/signup
//! POST   /api/auth/login
//! POST   /api/auth/logout
//! GET    /api/auth/me
//!
//! # Checkout (rate limited)
//! GET    /api/checkout/options
//! POST   /api/checkout/quote
//! POST   /api/checkout/complete
//!
//! # Orders (requires auth)
//! GET    /api/orders                      - History (?month=YYYY-MM)
//! GET    /api/orders/{id}
//!
//! # Contact (rate limited)
//! POST   /api/contact
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod orders;
pub mod preferences;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Catalog routes.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(catalog::settings))
        .route("/categories", get(catalog::categories))
        .route("/price-ranges", get(catalog::price_ranges))
        .route("/products", get(catalog::list))
        .route("/products/featured", get(catalog::featured_products))
        .route("/products/{id}", get(catalog::show))
}

/// Cart routes.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{product_id}",
            delete(cart::remove).patch(cart::update),
        )
}

/// Wishlist routes.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/items", post(wishlist::add))
        .route("/items/{product_id}", delete(wishlist::remove))
        .route("/items/{product_id}/cart", post(wishlist::move_to_cart))
}

/// Preference routes.
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/theme",
            get(preferences::theme).put(preferences::set_theme),
        )
        .route("/theme/toggle", post(preferences::toggle_theme))
}

/// Auth routes. Signup and login are rate limited.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter())
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Checkout routes.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/options", get(checkout::options))
        .route("/quote", post(checkout::quote))
        .route("/complete", post(checkout::complete))
        .layer(api_rate_limiter())
}

/// Order history routes.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", get(orders::show))
}

/// All `/api` routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/preferences", preference_routes())
        .nest("/auth", auth_routes())
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
        .route(
            "/contact",
            post(contact::submit).layer(auth_rate_limiter()),
        );

    Router::new().nest("/api", api)
}
