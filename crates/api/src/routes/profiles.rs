//! Route definitions for the per-person profiles.
//!
//! Mounted at `/profiles` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Profile routes.
///
/// ```text
/// GET    /            -> list_profiles
/// PATCH  /            -> update_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(profiles::list_profiles).patch(profiles::update_profile),
    )
}
