//! The fixed set of staff members sharing the dashboard.
//!
//! Person notes and profiles are keyed by these identifiers; there is no
//! user table and no sign-up flow (the shop has four people).

use serde::{Deserialize, Serialize};

/// Keys of the team members, in display order.
pub const TEAM_MEMBERS: [&str; 4] = ["loic", "charlie", "melina", "amandine"];

/// Whether `key` names a known team member.
pub fn is_team_member(key: &str) -> bool {
    TEAM_MEMBERS.contains(&key)
}

/// One entry of a person note's todo list.
///
/// Todos live inside the note record as an ordered array; array order is
/// display order, so there is no separate position field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_members_are_recognized() {
        for key in TEAM_MEMBERS {
            assert!(is_team_member(key));
        }
    }

    #[test]
    fn unknown_member_is_rejected() {
        assert!(!is_team_member("renaud"));
        assert!(!is_team_member(""));
        assert!(!is_team_member("Loic"));
    }

    #[test]
    fn todo_item_round_trips_through_json() {
        let todo = TodoItem {
            id: "t1".into(),
            text: "commander du fil".into(),
            done: false,
        };
        let json = serde_json::to_string(&todo).unwrap();
        let back: TodoItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, todo);
    }
}
