//! Repository for the `remarks` table.
//!
//! Text and photo remarks are append-only. Status remarks are a special
//! kind with supersede semantics: writing one deletes the previous status
//! remark for the room, so at most one is live at any time. All read
//! methods accept an optional day filter; `None` reads the whole log.

use chrono::Utc;
use rounds_core::types::{Day, RemarkKind, RoomStatus, UserId};
use sqlx::SqlitePool;

use crate::models::remark::{NewRemark, Remark};

/// Column list for remarks queries.
const COLUMNS: &str = "id, user_id, room_id, kind, content, caption, day, created_at";

/// Append and aggregate operations over the remark log.
pub struct RemarkRepo;

impl RemarkRepo {
    /// Append a remark, stamping it with the current UTC day.
    pub async fn create(pool: &SqlitePool, input: &NewRemark<'_>) -> Result<Remark, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO remarks (user_id, room_id, kind, content, caption, day, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Remark>(&query)
            .bind(input.user_id)
            .bind(input.room_id)
            .bind(input.kind.as_str())
            .bind(input.content)
            .bind(input.caption)
            .bind(now.date_naive())
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Number of text/photo remarks for a room. Status remarks are not
    /// remarks in the user-facing sense and are excluded.
    pub async fn count_for_room(
        pool: &SqlitePool,
        room_id: &str,
        day: Option<Day>,
    ) -> Result<i64, sqlx::Error> {
        match day {
            Some(day) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM remarks WHERE room_id = ? AND kind != ? AND day = ?",
                )
                .bind(room_id)
                .bind(RemarkKind::Status.as_str())
                .bind(day)
                .fetch_one(pool)
                .await
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM remarks WHERE room_id = ? AND kind != ?",
                )
                .bind(room_id)
                .bind(RemarkKind::Status.as_str())
                .fetch_one(pool)
                .await
            }
        }
    }

    /// All remarks for a room in chronological order, status rows included.
    pub async fn list_for_room(
        pool: &SqlitePool,
        room_id: &str,
        day: Option<Day>,
    ) -> Result<Vec<Remark>, sqlx::Error> {
        match day {
            Some(day) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM remarks WHERE room_id = ? AND day = ?
                     ORDER BY created_at ASC, id ASC"
                );
                sqlx::query_as::<_, Remark>(&query)
                    .bind(room_id)
                    .bind(day)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM remarks WHERE room_id = ?
                     ORDER BY created_at ASC, id ASC"
                );
                sqlx::query_as::<_, Remark>(&query)
                    .bind(room_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Write the room's status remark, superseding any previous one.
    ///
    /// With a day filter only that day's status remark is replaced;
    /// without one the room carries a single status remark globally.
    /// Delete and insert run in one transaction.
    pub async fn set_room_status(
        pool: &SqlitePool,
        room_id: &str,
        user_id: UserId,
        status: RoomStatus,
        day: Option<Day>,
    ) -> Result<Remark, sqlx::Error> {
        let mut tx = pool.begin().await?;
        match day {
            Some(day) => {
                sqlx::query("DELETE FROM remarks WHERE room_id = ? AND kind = ? AND day = ?")
                    .bind(room_id)
                    .bind(RemarkKind::Status.as_str())
                    .bind(day)
                    .execute(&mut *tx)
                    .await?;
            }
            None => {
                sqlx::query("DELETE FROM remarks WHERE room_id = ? AND kind = ?")
                    .bind(room_id)
                    .bind(RemarkKind::Status.as_str())
                    .execute(&mut *tx)
                    .await?;
            }
        }
        let now = Utc::now();
        let query = format!(
            "INSERT INTO remarks (user_id, room_id, kind, content, caption, day, created_at)
             VALUES (?, ?, ?, ?, NULL, ?, ?)
             RETURNING {COLUMNS}"
        );
        let remark = sqlx::query_as::<_, Remark>(&query)
            .bind(user_id)
            .bind(room_id)
            .bind(RemarkKind::Status.as_str())
            .bind(status.as_str())
            .bind(now.date_naive())
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(remark)
    }

    /// Live status for a room; `Pending` when no status remark exists.
    pub async fn room_status(
        pool: &SqlitePool,
        room_id: &str,
        day: Option<Day>,
    ) -> Result<RoomStatus, sqlx::Error> {
        let content: Option<String> = match day {
            Some(day) => {
                sqlx::query_scalar(
                    "SELECT content FROM remarks WHERE room_id = ? AND kind = ? AND day = ?
                     ORDER BY created_at DESC, id DESC LIMIT 1",
                )
                .bind(room_id)
                .bind(RemarkKind::Status.as_str())
                .bind(day)
                .fetch_optional(pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT content FROM remarks WHERE room_id = ? AND kind = ?
                     ORDER BY created_at DESC, id DESC LIMIT 1",
                )
                .bind(room_id)
                .bind(RemarkKind::Status.as_str())
                .fetch_optional(pool)
                .await?
            }
        };
        Ok(content
            .and_then(|v| RoomStatus::parse(&v))
            .unwrap_or_default())
    }

    /// Text/photo remark counts grouped by room, for menu aggregation.
    pub async fn counts_by_room(
        pool: &SqlitePool,
        day: Option<Day>,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        match day {
            Some(day) => {
                sqlx::query_as(
                    "SELECT room_id, COUNT(*) FROM remarks WHERE kind != ? AND day = ?
                     GROUP BY room_id",
                )
                .bind(RemarkKind::Status.as_str())
                .bind(day)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT room_id, COUNT(*) FROM remarks WHERE kind != ? GROUP BY room_id",
                )
                .bind(RemarkKind::Status.as_str())
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Rooms whose live status remark says `good`.
    pub async fn good_rooms(
        pool: &SqlitePool,
        day: Option<Day>,
    ) -> Result<Vec<String>, sqlx::Error> {
        match day {
            Some(day) => {
                sqlx::query_scalar(
                    "SELECT room_id FROM remarks WHERE kind = ? AND content = ? AND day = ?",
                )
                .bind(RemarkKind::Status.as_str())
                .bind(RoomStatus::Good.as_str())
                .bind(day)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_scalar(
                    "SELECT room_id FROM remarks WHERE kind = ? AND content = ?",
                )
                .bind(RemarkKind::Status.as_str())
                .bind(RoomStatus::Good.as_str())
                .fetch_all(pool)
                .await
            }
        }
    }
}
