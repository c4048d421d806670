use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

use crate::entries::dto::EntryChanges;

/// Diary entry. `user_id` is the owner and never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub entry_id: i32,
    pub user_id: i32,
    pub entry_date: Date,
    pub mood: Option<String>,
    pub weight: Option<f64>,
    pub sleep_hours: Option<i32>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Entry {
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Entry>> {
        sqlx::query_as::<_, Entry>(
            r#"
            SELECT entry_id, user_id, entry_date, mood, weight, sleep_hours, notes, created_at
            FROM entries
            ORDER BY entry_date DESC, entry_id DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn list_by_owner(db: &PgPool, user_id: i32) -> sqlx::Result<Vec<Entry>> {
        sqlx::query_as::<_, Entry>(
            r#"
            SELECT entry_id, user_id, entry_date, mood, weight, sleep_hours, notes, created_at
            FROM entries
            WHERE user_id = $1
            ORDER BY entry_date DESC, entry_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, entry_id: i32) -> sqlx::Result<Option<Entry>> {
        sqlx::query_as::<_, Entry>(
            r#"
            SELECT entry_id, user_id, entry_date, mood, weight, sleep_hours, notes, created_at
            FROM entries
            WHERE entry_id = $1
            "#,
        )
        .bind(entry_id)
        .fetch_optional(db)
        .await
    }

    /// `user_id` comes from the caller's principal, never from the request
    /// body; that is what pins ownership to the creator.
    pub async fn create(
        db: &PgPool,
        user_id: i32,
        entry_date: Date,
        changes: &EntryChanges,
    ) -> sqlx::Result<Entry> {
        sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (user_id, entry_date, mood, weight, sleep_hours, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING entry_id, user_id, entry_date, mood, weight, sleep_hours, notes, created_at
            "#,
        )
        .bind(user_id)
        .bind(entry_date)
        .bind(&changes.mood)
        .bind(changes.weight)
        .bind(changes.sleep_hours)
        .bind(&changes.notes)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their stored values.
    pub async fn update(db: &PgPool, entry_id: i32, changes: &EntryChanges) -> sqlx::Result<Entry> {
        sqlx::query_as::<_, Entry>(
            r#"
            UPDATE entries
            SET entry_date  = COALESCE($2, entry_date),
                mood        = COALESCE($3, mood),
                weight      = COALESCE($4, weight),
                sleep_hours = COALESCE($5, sleep_hours),
                notes       = COALESCE($6, notes)
            WHERE entry_id = $1
            RETURNING entry_id, user_id, entry_date, mood, weight, sleep_hours, notes, created_at
            "#,
        )
        .bind(entry_id)
        .bind(changes.entry_date)
        .bind(&changes.mood)
        .bind(changes.weight)
        .bind(changes.sleep_hours)
        .bind(&changes.notes)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, entry_id: i32) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM entries WHERE entry_id = $1")
            .bind(entry_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
