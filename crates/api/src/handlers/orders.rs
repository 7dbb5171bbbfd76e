//! Handlers for order ingestion and the order board.
//!
//! Orders arrive from the shop as webhooks; the dashboard relays a
//! `new-order` event to every open stream so boards update without
//! polling. The dashboard never mutates orders beyond ingest.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use atelier_core::validate::{clamp_limit, clamp_offset};
use atelier_db::models::order::{CreateOrder, CreateOrderItem, OrderSummary};
use atelier_db::repositories::OrderRepo;
use atelier_events::DashboardEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing orders.
#[derive(Debug, serde::Deserialize)]
pub struct ListOrderParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /orders?limit=&offset=
///
/// Newest orders first, items embedded.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListOrderParams>,
) -> AppResult<impl IntoResponse> {
    let orders = OrderRepo::list(
        &state.pool,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: orders }))
}

/// POST /orders
///
/// Webhook ingest. A duplicate `order_number` maps to 409 through the
/// unique constraint, so shop-side retries are harmless.
pub async fn ingest_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> AppResult<impl IntoResponse> {
    if input.order_number.trim().is_empty() {
        return Err(AppError::BadRequest("order_number is required".to_string()));
    }
    if input.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest("customer_name is required".to_string()));
    }

    let order = OrderRepo::create(&state.pool, &input).await?;

    state
        .event_bus
        .publish(DashboardEvent::NewOrder(OrderSummary::from(&order.order)));

    tracing::info!(
        order_id = order.order.id,
        order_number = %order.order.order_number,
        items = order.items.len(),
        "Order ingested"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// POST /orders/test
///
/// Create a sample order. Development helper for exercising the live
/// stream without the real shop webhook.
pub async fn create_test_order(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let input = CreateOrder {
        order_number: format!("TEST-{}", &suffix[..8]),
        customer_name: "Marie Dupont".to_string(),
        customer_email: "marie.dupont@example.com".to_string(),
        customer_phone: Some("+33 6 12 34 56 78".to_string()),
        status: None,
        payment_status: Some(atelier_db::models::order::PaymentStatus::Paid),
        total: 149.99,
        subtotal: 129.99,
        shipping: Some(9.9),
        tax: Some(10.1),
        currency: None,
        notes: None,
        category: Some("t-shirt".to_string()),
        deadline: None,
        items: vec![
            CreateOrderItem {
                name: "T-Shirt Premium Noir".to_string(),
                sku: Some("TSP-NOIR-001".to_string()),
                quantity: 2,
                price: 49.99,
                image_url: None,
            },
            CreateOrderItem {
                name: "Mug Signature".to_string(),
                sku: Some("MUG-SIG-01".to_string()),
                quantity: 1,
                price: 30.01,
                image_url: None,
            },
        ],
    };

    let order = OrderRepo::create(&state.pool, &input).await?;

    state
        .event_bus
        .publish(DashboardEvent::NewOrder(OrderSummary::from(&order.order)));

    tracing::info!(
        order_id = order.order.id,
        order_number = %order.order.order_number,
        "Test order created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// GET /orders/stats
///
/// Aggregated figures for the stats cards.
pub async fn order_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = OrderRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
