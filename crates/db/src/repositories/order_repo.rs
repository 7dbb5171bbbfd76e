//! Repository for the `orders` and `order_items` tables.

use std::collections::HashMap;

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{
    CreateOrder, Order, OrderItem, OrderStats, OrderStatus, OrderWithItems, PaymentStatus,
};

/// Column list for `orders` queries.
const ORDER_COLUMNS: &str = "\
    id, order_number, customer_name, customer_email, customer_phone, \
    status, payment_status, total, subtotal, shipping, tax, currency, \
    notes, category, deadline, created_at, updated_at";

/// Column list for `order_items` queries.
const ITEM_COLUMNS: &str = "id, order_id, name, sku, quantity, price, image_url";

/// Read and ingest operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order and its line items in one transaction.
    ///
    /// A duplicate `order_number` violates `uq_orders_order_number` and
    /// surfaces as a database error the API maps to 409.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrder,
    ) -> Result<OrderWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let order_query = format!(
            "INSERT INTO orders \
                 (order_number, customer_name, customer_email, customer_phone, \
                  status, payment_status, total, subtotal, shipping, tax, \
                  currency, notes, category, deadline) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&order_query)
            .bind(&input.order_number)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(input.customer_phone.as_deref())
            .bind(input.status.unwrap_or(OrderStatus::CommandeATraiter))
            .bind(input.payment_status.unwrap_or(PaymentStatus::Pending))
            .bind(input.total)
            .bind(input.subtotal)
            .bind(input.shipping.unwrap_or(0.0))
            .bind(input.tax.unwrap_or(0.0))
            .bind(input.currency.as_deref().unwrap_or("EUR"))
            .bind(input.notes.as_deref())
            .bind(input.category.as_deref())
            .bind(input.deadline)
            .fetch_one(&mut *tx)
            .await?;

        let item_query = format!(
            "INSERT INTO order_items (order_id, name, sku, quantity, price, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let inserted = sqlx::query_as::<_, OrderItem>(&item_query)
                .bind(order.id)
                .bind(&item.name)
                .bind(item.sku.as_deref())
                .bind(item.quantity)
                .bind(item.price)
                .bind(item.image_url.as_deref())
                .fetch_one(&mut *tx)
                .await?;
            items.push(inserted);
        }

        tx.commit().await?;
        Ok(OrderWithItems { order, items })
    }

    /// Page of orders, newest first, with their items embedded.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        let orders = sqlx::query_as::<_, Order>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = orders.iter().map(|o| o.id).collect();
        let item_query = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items \
             WHERE order_id = ANY($1) \
             ORDER BY id"
        );
        let items = sqlx::query_as::<_, OrderItem>(&item_query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_order: HashMap<DbId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }

    /// One order with items, if it exists.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OrderWithItems>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let Some(order) = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let item_query = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        );
        let items = sqlx::query_as::<_, OrderItem>(&item_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        Ok(Some(OrderWithItems { order, items }))
    }

    /// Aggregated figures for the stats cards, in one round trip.
    pub async fn stats(pool: &PgPool) -> Result<OrderStats, sqlx::Error> {
        sqlx::query_as::<_, OrderStats>(
            "SELECT \
                 COUNT(*) AS total_orders, \
                 COALESCE(SUM(total), 0) AS total_revenue, \
                 COUNT(*) FILTER (WHERE payment_status = 'PENDING') AS pending_orders, \
                 COUNT(*) FILTER (WHERE payment_status = 'PAID') AS paid_orders, \
                 COUNT(*) FILTER (WHERE created_at >= date_trunc('day', NOW())) AS today_orders, \
                 COALESCE(SUM(total) FILTER (WHERE created_at >= date_trunc('day', NOW())), 0) \
                     AS today_revenue \
             FROM orders",
        )
        .fetch_one(pool)
        .await
    }
}
