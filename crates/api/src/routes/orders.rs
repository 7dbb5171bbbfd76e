//! Route definitions for orders.
//!
//! Mounted at `/orders` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;
use crate::stream;

/// Order routes.
///
/// ```text
/// GET    /            -> list_orders (?limit, offset)
/// POST   /            -> ingest_order (shop webhook)
/// POST   /test        -> create_test_order (dev helper)
/// GET    /stats       -> order_stats
/// GET    /stream      -> SSE stream of order events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::ingest_order))
        .route("/test", post(orders::create_test_order))
        .route("/stats", get(orders::order_stats))
        .route("/stream", get(stream::orders_stream))
}
