//! Handlers for the shared person notes.
//!
//! Notes are keyed by the fixed team registry; a GET auto-creates the row
//! so the board never renders a missing card.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use atelier_core::validate::validate_person;
use atelier_db::models::person_note::UpdatePersonNote;
use atelier_db::repositories::NoteRepo;
use atelier_events::{DashboardEvent, NoteChange};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /notes
///
/// All four notes, in team display order.
pub async fn list_notes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let notes = NoteRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// GET /notes/{person}
pub async fn get_note(
    State(state): State<AppState>,
    Path(person): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_person(&person).map_err(AppError::BadRequest)?;

    let note = NoteRepo::get_or_create(&state.pool, &person).await?;
    Ok(Json(DataResponse { data: note }))
}

/// PATCH /notes/{person}
///
/// Update content and/or the todo array. The published event carries only
/// the parts that changed.
pub async fn update_note(
    State(state): State<AppState>,
    Path(person): Path<String>,
    Json(input): Json<UpdatePersonNote>,
) -> AppResult<impl IntoResponse> {
    validate_person(&person).map_err(AppError::BadRequest)?;

    // The row may not exist yet if nothing was ever read for this person.
    NoteRepo::get_or_create(&state.pool, &person).await?;

    let note = NoteRepo::update(&state.pool, &person, &input)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("note row missing for {person}")))?;

    state.event_bus.publish(DashboardEvent::NoteChanged(NoteChange {
        person: person.clone(),
        content: input.content.clone(),
        todos: input.todos.clone(),
    }));

    tracing::info!(
        person = %person,
        todos = note.todos.0.len(),
        "Person note updated"
    );

    Ok(Json(DataResponse { data: note }))
}
