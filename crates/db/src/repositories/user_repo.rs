//! Repository for the `users` table.

use chrono::Utc;
use rounds_core::types::UserId;
use sqlx::SqlitePool;

use crate::models::user::Profile;

/// Column list for users queries.
const COLUMNS: &str = "id, phone, name, position, current_room, created_at";

/// Profile lookups and registration writes.
pub struct UserRepo;

impl UserRepo {
    /// Fetch the profile for `id`, creating an empty row on first sight.
    /// Safe to call on every update.
    pub async fn get_or_create(pool: &SqlitePool, id: UserId) -> Result<Profile, sqlx::Error> {
        sqlx::query("INSERT INTO users (id, created_at) VALUES (?, ?) ON CONFLICT(id) DO NOTHING")
            .bind(id)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write all three registration fields in one statement, returning the
    /// updated row.
    pub async fn complete_registration(
        pool: &SqlitePool,
        id: UserId,
        phone: &str,
        name: &str,
        position: &str,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "UPDATE users SET phone = ?, name = ?, position = ? WHERE id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(phone)
            .bind(name)
            .bind(position)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Point the user at a room, or clear the pointer with `None`.
    pub async fn set_current_room(
        pool: &SqlitePool,
        id: UserId,
        room_id: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET current_room = ? WHERE id = ?")
            .bind(room_id)
            .bind(id)
            .execute(pool)
            .await
            .map(|_| ())
    }
}
