//! HTTP middleware stack for the back office.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors and transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (fresh ID per request)
//! 4. Security headers (no caching, no framing)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Auth guard on protected `/api` routes

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AdminAuthRejection, RequireAdminAuth, clear_current_admin, require_admin, set_current_admin,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
