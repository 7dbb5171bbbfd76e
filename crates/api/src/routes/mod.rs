pub mod health;
pub mod notes;
pub mod orders;
pub mod planning;
pub mod profiles;
pub mod workflow;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::stream;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /stream                         SSE: all dashboard events
///
/// /orders                         list, ingest webhook (GET, POST)
/// /orders/test                    create sample order (POST)
/// /orders/stats                   stats rollup (GET)
/// /orders/stream                  SSE: order events only
///
/// /workflow                       grouped lists, create (GET, POST)
/// /workflow/{id}                  update, delete (PATCH, DELETE)
/// /workflow/reorder               batch position rewrite (POST)
///
/// /planning                       list, create (GET, POST)
/// /planning/{id}                  update, delete (PATCH, DELETE)
/// /planning/reorder               batch position rewrite (POST)
///
/// /notes                          all four notes (GET)
/// /notes/{person}                 get, update (GET, PATCH)
///
/// /profiles                       all four profiles, upsert (GET, PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Live update stream for the whole dashboard.
        .route("/stream", get(stream::dashboard_stream))
        // Orders: webhook ingest, board reads, and the order-only stream.
        .nest("/orders", orders::router())
        // The four workflow lists.
        .nest("/workflow", workflow::router())
        // The global planning grid.
        .nest("/planning", planning::router())
        // Shared per-person notes.
        .nest("/notes", notes::router())
        // Per-person profiles.
        .nest("/profiles", profiles::router())
}
