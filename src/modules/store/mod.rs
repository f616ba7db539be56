//! Store module for love-wall persistence
//!
//! Notes, comments and rate-limit rows live in an external relational
//! store. Two adapters are provided: a direct PostgreSQL pool and a hosted
//! PostgREST endpoint reached over HTTPS. No state is cached in-process;
//! every call round-trips to the store.

mod postgres_store;
mod rest_store;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::features::love_wall::models::{Comment, NewComment, NewNote, Note};
use crate::features::rate_limits::models::RateLimitRecord;

pub use postgres_store::PostgresStore;
pub use rest_store::RestStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with an error status; `message` is its own text
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Store returned no row from {0}")]
    MissingRow(&'static str),
}

impl StoreError {
    /// Build a rejection from an error response body, preferring the
    /// `message` field PostgREST puts in its JSON errors.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| format!("Store request failed with HTTP {}", status));

        StoreError::Rejected { status, message }
    }
}

/// Read-modify-write access to per-client rate-limit rows
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn find_rate_limit(&self, client_id: &str)
        -> Result<Option<RateLimitRecord>, StoreError>;

    async fn insert_rate_limit(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Overwrite both the count and the window expiry
    async fn restart_window(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Overwrite the count only, leaving the window expiry untouched
    async fn update_count(&self, client_id: &str, count: i32) -> Result<(), StoreError>;
}

/// Note and comment rows
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Newest first, at most `limit` rows
    async fn list_notes(&self, limit: i64) -> Result<Vec<Note>, StoreError>;

    async fn insert_note(&self, note: &NewNote) -> Result<Note, StoreError>;

    /// Oldest first, at most `limit` rows
    async fn list_comments(&self, note_id: Uuid, limit: i64) -> Result<Vec<Comment>, StoreError>;

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, StoreError>;
}

/// Handles to the content and rate-limit stores
///
/// Both usually point at the same physical store.
#[derive(Clone)]
pub struct Stores {
    pub content: Arc<dyn ContentStore>,
    pub rate_limits: Arc<dyn RateLimitStore>,
}

impl Stores {
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: ContentStore + RateLimitStore + 'static,
    {
        Self {
            content: store.clone(),
            rate_limits: store,
        }
    }
}
