//! Repository for the `person_notes` table.

use atelier_core::team::{TodoItem, TEAM_MEMBERS};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::person_note::{PersonNote, UpdatePersonNote};

/// Column list for `person_notes` queries.
const COLUMNS: &str = "person, content, todos, created_at, updated_at";

/// Read/update operations for person notes.
///
/// Rows are keyed by the fixed team registry and lazily created on first
/// access, so callers never see a missing note for a known person.
pub struct NoteRepo;

impl NoteRepo {
    /// Fetch a person's note, creating an empty row if none exists yet.
    pub async fn get_or_create(
        pool: &PgPool,
        person: &str,
    ) -> Result<PersonNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO person_notes (person) VALUES ($1) \
             ON CONFLICT (person) DO UPDATE SET person = EXCLUDED.person \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PersonNote>(&query)
            .bind(person)
            .fetch_one(pool)
            .await
    }

    /// All four notes, in team display order (rows created as needed).
    pub async fn list(pool: &PgPool) -> Result<Vec<PersonNote>, sqlx::Error> {
        let mut notes = Vec::with_capacity(TEAM_MEMBERS.len());
        for person in TEAM_MEMBERS {
            notes.push(Self::get_or_create(pool, person).await?);
        }
        Ok(notes)
    }

    /// Update content and/or todos; absent fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        person: &str,
        input: &UpdatePersonNote,
    ) -> Result<Option<PersonNote>, sqlx::Error> {
        let todos: Option<Json<Vec<TodoItem>>> = input.todos.clone().map(Json);
        let query = format!(
            "UPDATE person_notes SET \
                 content = COALESCE($2, content), \
                 todos = COALESCE($3, todos), \
                 updated_at = NOW() \
             WHERE person = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PersonNote>(&query)
            .bind(person)
            .bind(input.content.as_deref())
            .bind(todos)
            .fetch_optional(pool)
            .await
    }
}
