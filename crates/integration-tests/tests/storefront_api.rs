//! Live storefront API tests.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database seeded with `demos/catalog.yaml`
//! - The storefront running (cargo run -p luxe-storefront)
//!
//! Run with: cargo test -p luxe-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use luxe_integration_tests::{session_client, storefront_base_url, unique_email};

async fn get_json(client: &Client, path: &str) -> Value {
    let resp = client
        .get(format!("{}{path}", storefront_base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
    resp.json().await.expect("Invalid JSON")
}

async fn post_json(client: &Client, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}{path}", storefront_base_url()))
        .json(body)
        .send()
        .await
        .expect("Request failed");
    let status = resp.status();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// First in-stock product id from the listing.
async fn in_stock_product(client: &Client) -> i64 {
    let products = get_json(client, "/api/products").await;
    products
        .as_array()
        .expect("products array")
        .iter()
        .find(|p| p["in_stock"] == true)
        .and_then(|p| p["id"].as_i64())
        .expect("Seed data has an in-stock product")
}

async fn sign_up(client: &Client, email: &str) {
    let (status, body) = post_json(
        client,
        "/api/auth/signup",
        &json!({
            "email": email,
            "password": "atelier24",
            "confirm_password": "atelier24",
            "first_name": "Ana",
            "last_name": "Mora",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_catalog_listing_and_filters() {
    let client = session_client();

    let categories = get_json(&client, "/api/categories").await;
    assert!(!categories.as_array().expect("categories").is_empty());

    let watches = get_json(&client, "/api/products?category=watch&sort=price-high").await;
    for product in watches.as_array().expect("products") {
        assert_eq!(product["category"], "watch");
    }

    let featured = get_json(&client, "/api/products/featured").await;
    assert!(featured.as_array().expect("featured").len() <= 3);

    let ranges = get_json(&client, "/api/price-ranges").await;
    assert_eq!(ranges.as_array().expect("ranges").len(), 4);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_product_detail_and_missing_product() {
    let client = session_client();
    let id = in_stock_product(&client).await;

    let detail = get_json(&client, &format!("/api/products/{id}")).await;
    assert_eq!(detail["product"]["id"], id);
    assert!(detail["related"].as_array().expect("related").len() <= 3);

    let resp = client
        .get(format!("{}/api/products/999999999", storefront_base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart & Wishlist
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_guest_cart_merges_and_clamps() {
    let client = session_client();
    let id = in_stock_product(&client).await;

    let (status, cart) =
        post_json(&client, "/api/cart/items", &json!({ "product_id": id, "quantity": 6 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 6);
    assert!(cart["last_added"].is_string());

    // Same product again merges into one line, capped at ten
    let (_, cart) =
        post_json(&client, "/api/cart/items", &json!({ "product_id": id, "quantity": 6 })).await;
    let items = cart["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 10);

    let resp = client
        .delete(format!("{}/api/cart", storefront_base_url()))
        .send()
        .await
        .expect("Request failed");
    assert!(resp.status().is_success());
    let cart = get_json(&client, "/api/cart").await;
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_wishlist_move_to_cart() {
    let client = session_client();
    let id = in_stock_product(&client).await;

    let (status, wishlist) =
        post_json(&client, "/api/wishlist/items", &json!({ "product_id": id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wishlist["items"].as_array().expect("items").len(), 1);

    let (status, cart) = post_json(
        &client,
        &format!("/api/wishlist/items/{id}/cart"),
        &json!({ "quantity": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 2);

    // Moving keeps the wishlist entry
    let wishlist = get_json(&client, "/api/wishlist").await;
    assert_eq!(wishlist["items"].as_array().expect("items").len(), 1);
}

// ============================================================================
// Accounts, Checkout & Orders
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_signup_checkout_and_history() {
    let client = session_client();
    let email = unique_email();
    sign_up(&client, &email).await;

    let me = get_json(&client, "/api/auth/me").await;
    assert_eq!(me["email"], email.as_str());

    let id = in_stock_product(&client).await;
    post_json(&client, "/api/cart/items", &json!({ "product_id": id, "quantity": 1 })).await;

    let options = get_json(&client, "/api/checkout/options").await;
    let method = options["default_shipping_method_id"].clone();

    let (status, quote) =
        post_json(&client, "/api/checkout/quote", &json!({ "shipping_method_id": method })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["item_count"], 1);

    let payment_order_id = format!("TEST-{}", uuid::Uuid::new_v4().simple());
    let (status, placed) = post_json(
        &client,
        "/api/checkout/complete",
        &json!({
            "payment_order_id": payment_order_id,
            "buyer_email": email,
            "buyer_name": "Ana Mora",
            "shipping_address": {
                "address_line_1": "1 Avenida Central",
                "admin_area_2": "San José",
                "postal_code": "10101",
                "admin_area_1": "San José",
            },
            "shipping_method_id": method,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{placed}");
    assert_eq!(placed["totals"]["grand_total"], quote["grand_total"]);

    // Cart is emptied by checkout
    let cart = get_json(&client, "/api/cart").await;
    assert_eq!(cart["item_count"], 0);

    let history = get_json(&client, "/api/orders").await;
    let orders = history.as_array().expect("orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["payment_order_id"], payment_order_id.as_str());
    assert_eq!(orders[0]["items"].as_array().expect("items").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_checkout_with_empty_cart_is_rejected() {
    let client = session_client();
    let (status, _) = post_json(
        &client,
        "/api/checkout/complete",
        &json!({ "payment_order_id": "TEST-EMPTY", "buyer_email": unique_email() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_order_history_requires_sign_in() {
    let client = session_client();
    let resp = client
        .get(format!("{}/api/orders", storefront_base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
