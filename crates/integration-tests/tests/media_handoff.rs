//! Images uploaded through the back office are served by the storefront.
//!
//! Both routers are built in-process over a shared temporary media root;
//! no database or running server is needed.

#![allow(clippy::unwrap_used)]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use luxe_admin::services::media::MediaStore;
use luxe_core::ProductId;
use luxe_core::settings::BusinessSettings;
use luxe_integration_tests::{admin_config, lazy_pool, storefront_config};

fn storefront(dir: &TempDir) -> axum::Router {
    let state = luxe_storefront::state::AppState::new(storefront_config(dir.path()), lazy_pool());
    luxe_storefront::app(state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_uploaded_product_image_is_served() {
    let dir = TempDir::new().unwrap();
    let config = admin_config(dir.path());
    let media = MediaStore::new(&config.media_root, &config.media_base_url);
    let folder = BusinessSettings::default().storage_folder();

    let image = media
        .save(&folder, Some(ProductId::new(7)), "front.png", b"\x89PNG")
        .await
        .unwrap();
    assert!(image.url.starts_with("http://localhost:3000/media/"));

    let (status, body) = get(storefront(&dir), &format!("/media/{}", image.path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"\x89PNG");
}

#[tokio::test]
async fn test_deleted_image_is_gone() {
    let dir = TempDir::new().unwrap();
    let media = MediaStore::new(dir.path(), "http://localhost:3000/media");
    let image = media.save("Luxe", None, "banner.webp", b"webp").await.unwrap();

    media.delete("Luxe", None, &image.name).await.unwrap();

    let (status, _) = get(storefront(&dir), &format!("/media/{}", image.path)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_orders_require_sign_in() {
    let dir = TempDir::new().unwrap();
    let admin_state = luxe_admin::state::AppState::new(admin_config(dir.path()), lazy_pool());
    let admin = luxe_admin::app(admin_state);

    let response = admin
        .oneshot(
            Request::builder()
                .uri("/api/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
