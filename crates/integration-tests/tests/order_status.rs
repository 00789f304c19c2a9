//! Order status API, end to end.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use sellah_integration_tests::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn test_status_requires_seller() {
    let server = TestServer::start().await;

    let resp = server
        .client()
        .get(server.url("/api/orders/status?status=completed"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_lookup() {
    let server = TestServer::start().await;
    let client = server.client();
    server.sign_in(&client).await;

    let body: Value = client
        .get(server.url("/api/orders/status?status=%20In_Transit%20"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["normalized"], "in transit");
    assert_eq!(body["label"], "In Transit");
    assert_eq!(body["display_status"], "shipping");

    let body: Value = client
        .get(server.url("/api/orders/status?status=on_hold"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["display_status"], "unknown");
    assert_eq!(body["label"], "on_hold");
    assert_eq!(body["color"], sellah_core::NEUTRAL_COLOR);

    let body: Value = client
        .get(server.url("/api/orders/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["display_status"], "unknown");
    assert_eq!(body["label"], "Unknown");
}

#[tokio::test]
async fn test_display_batch() {
    let server = TestServer::start().await;
    let client = server.client();
    server.sign_in(&client).await;

    let orders = json!([
        { "status": "in transit", "is_pickup": false, "out_of_delivery": true },
        { "status": "ready for pickup", "is_pickup": true },
        { "status": "PAYMENT_SENT" },
        { "status": "cancelled" },
    ]);

    let resp = client
        .post(server.url("/api/orders/display"))
        .json(&orders)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body[0]["display_status"], "shipping");
    assert_eq!(body[0]["shipping_label"], "out for delivery");
    assert_eq!(body[1]["shipping_label"], "ready for pickup");
    assert_eq!(body[2]["display_status"], "unknown");
    assert_eq!(body[2]["shipping_label"], Value::Null);
    assert_eq!(body[3]["display_status"], "cancelled");
}

#[tokio::test]
async fn test_display_batch_limit() {
    let server = TestServer::start().await;
    let client = server.client();
    server.sign_in(&client).await;

    let orders: Vec<Value> = (0..=sellah_dashboard::routes::api::orders::MAX_ORDERS_PER_REQUEST)
        .map(|_| json!({ "status": "completed" }))
        .collect();

    let resp = client
        .post(server.url("/api/orders/display"))
        .json(&orders)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("orders per request"));
}
