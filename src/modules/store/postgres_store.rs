//! PostgreSQL adapter backed by a `sqlx` pool

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{ContentStore, RateLimitStore, StoreError};
use crate::features::love_wall::models::{Comment, NewComment, NewNote, Note};
use crate::features::rate_limits::models::RateLimitRecord;

#[derive(Debug, FromRow)]
struct RateLimitRow {
    count: i32,
    reset_at: Option<DateTime<Utc>>,
}

impl From<RateLimitRow> for RateLimitRecord {
    fn from(row: RateLimitRow) -> Self {
        Self {
            count: row.count,
            reset_at: row.reset_at,
        }
    }
}

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for PostgresStore {
    async fn find_rate_limit(
        &self,
        client_id: &str,
    ) -> Result<Option<RateLimitRecord>, StoreError> {
        let row = sqlx::query_as::<_, RateLimitRow>(
            r#"
            SELECT count, reset_at
            FROM love_wall_rate_limits
            WHERE ip = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read rate limit for {}: {:?}", client_id, e);
            StoreError::Database(e)
        })?;

        Ok(row.map(Into::into))
    }

    async fn insert_rate_limit(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO love_wall_rate_limits (ip, count, reset_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(client_id)
        .bind(count)
        .bind(reset_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create rate limit for {}: {:?}", client_id, e);
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn restart_window(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE love_wall_rate_limits
            SET count = $2, reset_at = $3
            WHERE ip = $1
            "#,
        )
        .bind(client_id)
        .bind(count)
        .bind(reset_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to reset rate limit for {}: {:?}", client_id, e);
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn update_count(&self, client_id: &str, count: i32) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE love_wall_rate_limits
            SET count = $2
            WHERE ip = $1
            "#,
        )
        .bind(client_id)
        .bind(count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to bump rate limit for {}: {:?}", client_id, e);
            StoreError::Database(e)
        })?;

        Ok(())
    }
}

#[async_trait]
impl ContentStore for PostgresStore {
    async fn list_notes(&self, limit: i64) -> Result<Vec<Note>, StoreError> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, name, message, emoji, color, created_at
            FROM love_wall
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list notes: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(notes)
    }

    async fn insert_note(&self, note: &NewNote) -> Result<Note, StoreError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO love_wall (name, message, emoji, color)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, message, emoji, color, created_at
            "#,
        )
        .bind(&note.name)
        .bind(&note.message)
        .bind(&note.emoji)
        .bind(&note.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create note: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(note)
    }

    async fn list_comments(&self, note_id: Uuid, limit: i64) -> Result<Vec<Comment>, StoreError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, note_id, name, comment, created_at
            FROM love_wall_comments
            WHERE note_id = $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(note_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments for note {}: {:?}", note_id, e);
            StoreError::Database(e)
        })?;

        Ok(comments)
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO love_wall_comments (note_id, name, comment)
            VALUES ($1, $2, $3)
            RETURNING id, note_id, name, comment, created_at
            "#,
        )
        .bind(comment.note_id)
        .bind(&comment.name)
        .bind(&comment.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment on note {}: {:?}", comment.note_id, e);
            StoreError::Database(e)
        })?;

        Ok(comment)
    }
}
