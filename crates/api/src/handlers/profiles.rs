//! Handlers for the per-person profiles (photo + mood line).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use atelier_core::validate::validate_person;
use atelier_db::models::user_profile::UpdateUserProfile;
use atelier_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /profiles
///
/// All four profiles, rows created on first read.
pub async fn list_profiles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profiles = ProfileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// PATCH /profiles
///
/// Upsert mood and/or photo for one person.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(input): Json<UpdateUserProfile>,
) -> AppResult<impl IntoResponse> {
    validate_person(&input.person).map_err(AppError::BadRequest)?;

    let profile = ProfileRepo::update(&state.pool, &input).await?;

    tracing::info!(person = %input.person, "User profile updated");

    Ok(Json(DataResponse { data: profile }))
}
