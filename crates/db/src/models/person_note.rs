//! Person note entity model and DTOs.

use atelier_core::team::TodoItem;
use atelier_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `person_notes` table: one shared note per team member.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PersonNote {
    pub person: String,
    pub content: String,
    pub todos: Json<Vec<TodoItem>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for partial note updates: content, todos, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePersonNote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<TodoItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todos_serialize_as_plain_array() {
        let note = PersonNote {
            person: "charlie".into(),
            content: String::new(),
            todos: Json(vec![TodoItem {
                id: "t1".into(),
                text: "maquette NS300".into(),
                done: true,
            }]),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["todos"][0]["text"], "maquette NS300");
        assert_eq!(json["todos"][0]["done"], true);
    }

    #[test]
    fn update_accepts_todos_only() {
        let patch: UpdatePersonNote =
            serde_json::from_str(r#"{"todos":[{"id":"a","text":"x","done":false}]}"#).unwrap();
        assert!(patch.content.is_none());
        assert_eq!(patch.todos.unwrap().len(), 1);
    }
}
