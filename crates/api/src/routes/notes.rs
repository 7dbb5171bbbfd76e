//! Route definitions for the shared person notes.
//!
//! Mounted at `/notes` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Note routes.
///
/// ```text
/// GET    /            -> list_notes
/// GET    /{person}    -> get_note (auto-creates the row)
/// PATCH  /{person}    -> update_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_notes))
        .route("/{person}", get(notes::get_note).patch(notes::update_note))
}
