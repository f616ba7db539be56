//! Hosted store adapter speaking the PostgREST dialect
//!
//! Every request carries the anon key both as `apikey` and as a bearer
//! token. Filters use PostgREST operators (`ip=eq.<id>`), inserts ask for
//! the created row back with `Prefer: return=representation`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{ContentStore, RateLimitStore, StoreError};
use crate::core::config::RestStoreConfig;
use crate::features::love_wall::models::{Comment, NewComment, NewNote, Note};
use crate::features::rate_limits::models::RateLimitRecord;
use crate::shared::constants::{COMMENTS_TABLE, NOTES_TABLE, RATE_LIMITS_TABLE};

const NOTE_COLUMNS: &str = "id,name,message,emoji,color,created_at";
const COMMENT_COLUMNS: &str = "id,note_id,name,comment,created_at";
const RATE_LIMIT_COLUMNS: &str = "count,reset_at";

#[derive(Debug, Deserialize)]
struct RateLimitRow {
    count: i32,
    reset_at: Option<String>,
}

impl From<RateLimitRow> for RateLimitRecord {
    fn from(row: RateLimitRow) -> Self {
        Self {
            count: row.count,
            reset_at: row
                .reset_at
                .as_deref()
                .and_then(RateLimitRecord::parse_reset_at),
        }
    }
}

fn to_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &RestStoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn ensure_success(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::rejected(status.as_u16(), &body))
    }

    fn log_failure(context: &str, e: &StoreError) {
        match e {
            StoreError::Rejected { status, message } => {
                tracing::error!("Store rejected request ({}): HTTP {}: {}", context, status, message)
            }
            _ => tracing::error!("Store request failed ({}): {}", context, e),
        }
    }
}

#[async_trait]
impl RateLimitStore for RestStore {
    async fn find_rate_limit(
        &self,
        client_id: &str,
    ) -> Result<Option<RateLimitRecord>, StoreError> {
        let ip_filter = format!("eq.{}", client_id);
        let result: Result<Vec<RateLimitRow>, StoreError> = async {
            let response = self
                .request(Method::GET, RATE_LIMITS_TABLE)
                .query(&[
                    ("select", RATE_LIMIT_COLUMNS),
                    ("ip", ip_filter.as_str()),
                    ("limit", "1"),
                ])
                .send()
                .await?;
            Self::rows::<RateLimitRow>(response).await
        }
        .await;

        result
            .map(|rows| rows.into_iter().next().map(Into::into))
            .inspect_err(|e| Self::log_failure("read rate limit", e))
    }

    async fn insert_rate_limit(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result: Result<(), StoreError> = async {
            let response = self
                .request(Method::POST, RATE_LIMITS_TABLE)
                .header("Prefer", "return=minimal")
                .json(&json!({
                    "ip": client_id,
                    "count": count,
                    "reset_at": to_timestamp(reset_at),
                }))
                .send()
                .await?;
            Self::ensure_success(response).await.map(|_| ())
        }
        .await;

        result.inspect_err(|e| Self::log_failure("create rate limit", e))
    }

    async fn restart_window(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let ip_filter = format!("eq.{}", client_id);
        let result: Result<(), StoreError> = async {
            let response = self
                .request(Method::PATCH, RATE_LIMITS_TABLE)
                .header("Prefer", "return=minimal")
                .query(&[("ip", ip_filter.as_str())])
                .json(&json!({
                    "count": count,
                    "reset_at": to_timestamp(reset_at),
                }))
                .send()
                .await?;
            Self::ensure_success(response).await.map(|_| ())
        }
        .await;

        result.inspect_err(|e| Self::log_failure("reset rate limit", e))
    }

    async fn update_count(&self, client_id: &str, count: i32) -> Result<(), StoreError> {
        let ip_filter = format!("eq.{}", client_id);
        let result: Result<(), StoreError> = async {
            let response = self
                .request(Method::PATCH, RATE_LIMITS_TABLE)
                .header("Prefer", "return=minimal")
                .query(&[("ip", ip_filter.as_str())])
                .json(&json!({ "count": count }))
                .send()
                .await?;
            Self::ensure_success(response).await.map(|_| ())
        }
        .await;

        result.inspect_err(|e| Self::log_failure("bump rate limit", e))
    }
}

#[async_trait]
impl ContentStore for RestStore {
    async fn list_notes(&self, limit: i64) -> Result<Vec<Note>, StoreError> {
        let limit = limit.to_string();
        let result: Result<Vec<Note>, StoreError> = async {
            let response = self
                .request(Method::GET, NOTES_TABLE)
                .query(&[
                    ("select", NOTE_COLUMNS),
                    ("order", "created_at.desc"),
                    ("limit", limit.as_str()),
                ])
                .send()
                .await?;
            Self::rows::<Note>(response).await
        }
        .await;

        result.inspect_err(|e| Self::log_failure("list notes", e))
    }

    async fn insert_note(&self, note: &NewNote) -> Result<Note, StoreError> {
        let result: Result<Note, StoreError> = async {
            let response = self
                .request(Method::POST, NOTES_TABLE)
                .header("Prefer", "return=representation")
                .query(&[("select", NOTE_COLUMNS)])
                .json(note)
                .send()
                .await?;
            Self::rows::<Note>(response)
                .await?
                .into_iter()
                .next()
                .ok_or(StoreError::MissingRow(NOTES_TABLE))
        }
        .await;

        result.inspect_err(|e| Self::log_failure("create note", e))
    }

    async fn list_comments(&self, note_id: Uuid, limit: i64) -> Result<Vec<Comment>, StoreError> {
        let note_filter = format!("eq.{}", note_id);
        let limit = limit.to_string();
        let result: Result<Vec<Comment>, StoreError> = async {
            let response = self
                .request(Method::GET, COMMENTS_TABLE)
                .query(&[
                    ("select", COMMENT_COLUMNS),
                    ("note_id", note_filter.as_str()),
                    ("order", "created_at.asc"),
                    ("limit", limit.as_str()),
                ])
                .send()
                .await?;
            Self::rows::<Comment>(response).await
        }
        .await;

        result.inspect_err(|e| Self::log_failure("list comments", e))
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let result: Result<Comment, StoreError> = async {
            let response = self
                .request(Method::POST, COMMENTS_TABLE)
                .header("Prefer", "return=representation")
                .query(&[("select", COMMENT_COLUMNS)])
                .json(comment)
                .send()
                .await?;
            Self::rows::<Comment>(response)
                .await?
                .into_iter()
                .next()
                .ok_or(StoreError::MissingRow(COMMENTS_TABLE))
        }
        .await;

        result.inspect_err(|e| Self::log_failure("create comment", e))
    }
}
