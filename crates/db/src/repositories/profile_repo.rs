//! Repository for the `user_profiles` table.

use atelier_core::team::TEAM_MEMBERS;
use sqlx::PgPool;

use crate::models::user_profile::{UpdateUserProfile, UserProfile};

/// Column list for `user_profiles` queries.
const COLUMNS: &str = "person, profile_photo_link, mood, created_at, updated_at";

/// Read/upsert operations for the four per-person profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Fetch a person's profile, creating an empty row if none exists yet.
    pub async fn get_or_create(
        pool: &PgPool,
        person: &str,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles (person) VALUES ($1) \
             ON CONFLICT (person) DO UPDATE SET person = EXCLUDED.person \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(person)
            .fetch_one(pool)
            .await
    }

    /// All four profiles, in team display order (rows created as needed).
    pub async fn list(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
        let mut profiles = Vec::with_capacity(TEAM_MEMBERS.len());
        for person in TEAM_MEMBERS {
            profiles.push(Self::get_or_create(pool, person).await?);
        }
        Ok(profiles)
    }

    /// Upsert mood and/or photo for one person.
    pub async fn update(
        pool: &PgPool,
        input: &UpdateUserProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles (person, mood, profile_photo_link) \
             VALUES ($1, COALESCE($2, ''), $3) \
             ON CONFLICT (person) DO UPDATE SET \
                 mood = COALESCE($2, user_profiles.mood), \
                 profile_photo_link = COALESCE($3, user_profiles.profile_photo_link), \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(&input.person)
            .bind(input.mood.as_deref())
            .bind(input.profile_photo_link.as_deref())
            .fetch_one(pool)
            .await
    }
}
