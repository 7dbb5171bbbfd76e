//! Route definitions for the workflow lists.
//!
//! Mounted at `/workflow` by `api_routes()`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Workflow routes.
///
/// ```text
/// GET    /            -> list_items (grouped by type)
/// POST   /            -> create_item
/// POST   /reorder     -> reorder_items
/// PATCH  /{id}        -> update_item
/// DELETE /{id}        -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workflow::list_items).post(workflow::create_item))
        .route("/reorder", post(workflow::reorder_items))
        .route(
            "/{id}",
            patch(workflow::update_item).delete(workflow::delete_item),
        )
}
