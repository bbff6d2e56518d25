//! HTTP route handlers for the back office.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness
//! GET    /health/ready                        - Readiness (database)
//!
//! # Auth (public)
//! POST   /api/auth/login                      - Shared password sign-in
//! POST   /api/auth/forgot-password            - Email a temporary password
//! POST   /api/auth/logout
//!
//! # Everything below requires a signed-in session
//! GET    /api/auth/me
//!
//! GET    /api/settings
//! PATCH  /api/settings                        - Also changes the password
//!
//! GET    /api/categories
//! POST   /api/categories
//! PATCH  /api/categories/{id}
//! DELETE /api/categories/{id}
//!
//! GET    /api/products                        - Includes inactive products
//! POST   /api/products
//! GET    /api/products/{id}
//! PATCH  /api/products/{id}
//! DELETE /api/products/{id}
//! GET    /api/products/{id}/images
//! POST   /api/products/{id}/images            - Multipart, field `file`
//! DELETE /api/products/{id}/images/{name}
//! POST   /api/uploads                         - Multipart, no product
//!
//! GET    /api/shipping-methods
//! POST   /api/shipping-methods
//! PATCH  /api/shipping-methods/{id}
//! DELETE /api/shipping-methods/{id}
//!
//! GET    /api/orders                          - ?email=&month=YYYY-MM
//! PATCH  /api/orders/{id}                     - Fulfilment fields
//! GET    /api/orders/{id}/items
//! ```

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod settings;
pub mod shipping;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};

use crate::middleware::require_admin;
use crate::state::AppState;

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Sign-in routes reachable without a session.
pub fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/logout", post(auth::logout))
}

/// Category routes.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            patch(categories::update).delete(categories::delete),
        )
}

/// Product and product image routes.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
        .route(
            "/{id}/images",
            get(products::list_images).post(products::upload_image),
        )
        .route("/{id}/images/{name}", delete(products::delete_image))
}

/// Shipping method routes.
pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shipping::list).post(shipping::create))
        .route("/{id}", patch(shipping::update).delete(shipping::delete))
}

/// Order routes.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", patch(orders::update))
        .route("/{id}/items", get(orders::items))
}

/// Routes behind [`require_admin`].
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/settings", get(settings::show).patch(settings::update))
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .route("/uploads", post(products::upload))
        .nest("/shipping-methods", shipping_routes())
        .nest("/orders", order_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .route_layer(axum::middleware::from_fn_with_state(state, require_admin))
}

/// All `/api` routes.
pub fn routes(state: AppState) -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", public_auth_routes())
        .merge(protected_routes(state));

    Router::new().nest("/api", api)
}
