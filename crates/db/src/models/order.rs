//! Order entity models and DTOs.
//!
//! Orders arrive through the shop webhook; the dashboard only reads them
//! and relays creation events, it never drives their lifecycle.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Where an order sits in the production pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    CommandeATraiter,
    CommandeEnAttente,
    CommandeAPreparer,
    MaquetteAFaire,
    PrtAFaire,
    EnAttenteValidation,
    EnCoursImpression,
    PressageAFaire,
    ClientAContacter,
    ClientPrevenu,
    Archives,
}

/// Payment state reported by the shop.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: DbId,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total: f64,
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub currency: String,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub name: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub image_url: Option<String>,
}

/// An order with its line items embedded, as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Compact order shape carried by the `new-order` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: DbId,
    pub order_number: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total: f64,
    pub currency: String,
    pub created_at: Timestamp,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number.clone(),
            customer_name: order.customer_name.clone(),
            status: order.status,
            payment_status: order.payment_status,
            total: order.total,
            currency: order.currency.clone(),
            created_at: order.created_at,
        }
    }
}

/// Webhook ingest DTO. Optional fields fall back to the column defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub total: f64,
    pub subtotal: f64,
    pub shipping: Option<f64>,
    pub tax: Option<f64>,
    pub currency: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<Timestamp>,
    #[serde(default)]
    pub items: Vec<CreateOrderItem>,
}

/// Line item of a webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderItem {
    pub name: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub image_url: Option<String>,
}

/// Aggregated figures for the stats cards.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub pending_orders: i64,
    pub paid_orders: i64,
    pub today_orders: i64,
    pub today_revenue: f64,
}
