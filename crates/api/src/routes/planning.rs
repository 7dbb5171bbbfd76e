//! Route definitions for the planning grid.
//!
//! Mounted at `/planning` by `api_routes()`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::planning;
use crate::state::AppState;

/// Planning routes.
///
/// ```text
/// GET    /            -> list_items
/// POST   /            -> create_item
/// POST   /reorder     -> reorder_items
/// PATCH  /{id}        -> update_item
/// DELETE /{id}        -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(planning::list_items).post(planning::create_item))
        .route("/reorder", post(planning::reorder_items))
        .route(
            "/{id}",
            patch(planning::update_item).delete(planning::delete_item),
        )
}
