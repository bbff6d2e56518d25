//! Luxe back-office library.
//!
//! The JSON API behind the shop owner's console: business settings, the
//! catalog with its images, shipping methods and order fulfilment. Exposed
//! as a library so the router can be built in tests.
//!
//! # Security
//!
//! Everything except sign-in sits behind one shared password per business.
//! Run it on a private network or behind TLS (`ADMIN_TLS_CERT`/`ADMIN_TLS_KEY`).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Build the full back-office router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes(state.clone()))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use luxe_core::settings::DEFAULT_BUSINESS_ID;

    use super::*;
    use crate::config::AdminConfig;

    fn state() -> AppState {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/luxe_unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_owned(),
            session_secret: SecretString::from("y".repeat(32)),
            business_id: DEFAULT_BUSINESS_ID,
            media_root: PathBuf::from("media"),
            media_base_url: "http://localhost:3000/media".to_owned(),
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        };
        // Never connects: the requests below do not touch the database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/luxe_unused")
            .unwrap();
        AppState::new(config, pool)
    }

    async fn send(method: Method, uri: &str) -> axum::response::Response {
        app(state())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_has_request_id_and_headers() {
        let response = send(Method::GET, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["cache-control"], "no-store, max-age=0");
    }

    #[tokio::test]
    async fn test_protected_routes_require_sign_in() {
        for (method, uri) in [
            (Method::GET, "/api/auth/me"),
            (Method::GET, "/api/settings"),
            (Method::PATCH, "/api/settings"),
            (Method::GET, "/api/products"),
            (Method::DELETE, "/api/products/1"),
            (Method::POST, "/api/uploads"),
            (Method::GET, "/api/shipping-methods"),
            (Method::GET, "/api/orders"),
            (Method::PATCH, "/api/orders/1"),
            (Method::GET, "/api/categories"),
        ] {
            let response = send(method.clone(), uri).await;
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_forgot_password_without_smtp_is_unavailable() {
        let response = send(Method::POST, "/api/auth/forgot-password").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
