//! Integration tests for order placement.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (bs-cli migrate)
//! - The storefront running against it (cargo run -p bookstore-storefront)
//!
//! Run with: cargo test -p bookstore-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use bookstore_integration_tests::{TestContext, checkout_body, jane_doe_form};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and PostgreSQL"]
async fn test_health_and_readiness() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Placement
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and PostgreSQL"]
async fn test_place_order_returns_details() {
    let ctx = TestContext::new().await;
    let book = ctx.seed_book(1299).await.unwrap();

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&checkout_body(jane_doe_form(), &book, 2))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let details: Value = resp.json().await.unwrap();
    let order_id = details["order"]["id"].as_i64().unwrap();
    assert!(order_id > 0);

    assert_eq!(details["customer"]["name"], "Jane Doe");
    assert_eq!(details["customer"]["email"], "jane@example.com");
    assert_eq!(details["customer"]["ccNumber"], "************1111");

    let line_items = details["lineItems"].as_array().unwrap();
    assert_eq!(line_items.len(), 1);
    assert_eq!(line_items[0]["bookId"], json!(book.id));
    assert_eq!(line_items[0]["quantity"], 2);
    assert_eq!(details["books"][0]["id"], json!(book.id));

    // 2 x 12.99 + 5.00 default surcharge
    assert_eq!(details["order"]["amount"], "30.98");

    // Reading it back gives the same document
    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let again: Value = resp.json().await.unwrap();
    assert_eq!(again, details);
}

#[tokio::test]
#[ignore = "Requires running storefront and PostgreSQL"]
async fn test_unknown_order_is_404() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/api/orders/999999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Rejections leave no rows behind
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and PostgreSQL"]
async fn test_invalid_email_is_rejected_without_writes() {
    let ctx = TestContext::new().await;
    let book = ctx.seed_book(850).await.unwrap();
    let orders_before = ctx.count("customer_order").await.unwrap();

    let mut form = jane_doe_form();
    form["email"] = json!("jane at example.com");

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&checkout_body(form, &book, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["fieldName"], "email");
    assert_eq!(ctx.count("customer_order").await.unwrap(), orders_before);
}

#[tokio::test]
#[ignore = "Requires running storefront and PostgreSQL"]
async fn test_failed_line_item_leaves_no_customer_or_order() {
    let ctx = TestContext::new().await;
    let book = ctx.seed_book(1100).await.unwrap();
    let trigger = ctx.fail_line_items_for(&book).await.unwrap();

    let name = format!("Rollback {}", &Uuid::new_v4().simple().to_string()[..8]);
    let mut form = jane_doe_form();
    form["name"] = json!(name);

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&checkout_body(form, &book, 1))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body: Value = resp.json().await.unwrap();
    let counts = ctx.count_for_customer_name(&name).await.unwrap();
    ctx.remove_line_item_failure(&trigger).await.unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["reason"], "Internal server error");
    assert_eq!(counts, (0, 0));
}

#[tokio::test]
#[ignore = "Requires running storefront and PostgreSQL"]
async fn test_stale_price_is_rejected() {
    let ctx = TestContext::new().await;
    let mut book = ctx.seed_book(2000).await.unwrap();
    book.price = bookstore_core::Money::from_cents(1500);

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&checkout_body(jane_doe_form(), &book, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["fieldName"], "price");
}
