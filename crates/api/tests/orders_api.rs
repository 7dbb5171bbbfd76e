//! Integration tests for order ingestion and the new-order notification.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get, send, send_json};
use serde_json::json;
use sqlx::PgPool;

use atelier_events::DashboardEvent;

fn webhook_payload(order_number: &str) -> serde_json::Value {
    json!({
        "order_number": order_number,
        "customer_name": "Marie Dupont",
        "customer_email": "marie@example.com",
        "total": 149.99,
        "subtotal": 129.99,
        "items": [
            { "name": "T-Shirt Premium", "sku": "TSP-001", "quantity": 2, "price": 49.99 }
        ]
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn webhook_ingest_stores_and_publishes_new_order(pool: PgPool) {
    let (app, bus) = common::build_test_app_with_bus(pool);
    let mut rx = bus.subscribe();

    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/orders",
        webhook_payload("CMD-1001"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["order_number"], "CMD-1001");
    assert_eq!(body["data"]["status"], "COMMANDE_A_TRAITER");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let event = rx.try_recv().expect("ingest must publish new-order");
    match event {
        DashboardEvent::NewOrder(order) => {
            assert_eq!(order.order_number, "CMD-1001");
            assert_eq!(order.customer_name, "Marie Dupont");
        }
        other => panic!("expected new-order, got: {other:?}"),
    }

    // The order shows up in the board listing.
    let response = get(app, "/api/v1/orders").await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_order_number_maps_to_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/orders",
        webhook_payload("CMD-1001"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Webhook retries resend the same order_number.
    let second = send_json(
        app,
        Method::POST,
        "/api/v1/orders",
        webhook_payload("CMD-1001"),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_order_number_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/orders",
        json!({
            "order_number": "  ",
            "customer_name": "Marie",
            "customer_email": "m@example.com",
            "total": 1.0,
            "subtotal": 1.0
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_order_endpoint_creates_a_sample(pool: PgPool) {
    let (app, bus) = common::build_test_app_with_bus(pool);
    let mut rx = bus.subscribe();

    let response = send(app.clone(), Method::POST, "/api/v1/orders/test").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let order_number = body["data"]["order_number"].as_str().unwrap();
    assert!(order_number.starts_with("TEST-"));
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    assert!(matches!(
        rx.try_recv().unwrap(),
        DashboardEvent::NewOrder(_)
    ));

    // Stats reflect the ingested order.
    let response = get(app, "/api/v1/orders/stats").await;
    let stats = body_json(response).await;
    assert_eq!(stats["data"]["total_orders"], 1);
    assert_eq!(stats["data"]["paid_orders"], 1);
}
