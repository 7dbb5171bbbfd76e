//! Per-person profile entity model and DTO.

use atelier_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub person: String,
    pub profile_photo_link: Option<String>,
    pub mood: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a person's mood and/or profile photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserProfile {
    pub person: String,
    pub mood: Option<String>,
    pub profile_photo_link: Option<String>,
}
