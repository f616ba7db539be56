use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::Utc;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::core::error::{AppError, Result, INVALID_PAYLOAD_MESSAGE};
use crate::features::love_wall::dtos::{
    CommentResponseDto, CreateCommentDto, CreateNoteDto, NoteResponseDto,
};
use crate::features::love_wall::models::{NewComment, NewNote};
use crate::features::love_wall::services::SubmissionPolicy;
use crate::features::rate_limits::services::{GateDecision, SubmissionGate};
use crate::modules::store::{StoreError, Stores};
use crate::shared::constants::{MAX_COMMENTS_LISTED, MAX_NOTES_LISTED};
use crate::shared::validation::{validate, SubmissionPayload, ValidatedFields};

/// Service behind the love-wall endpoints
///
/// `stores` is `None` when the store credentials were not configured; every
/// operation then fails with [`AppError::ConfigurationMissing`].
pub struct LoveWallService {
    stores: Option<Stores>,
    notes: SubmissionPolicy,
    comments: SubmissionPolicy,
}

impl LoveWallService {
    pub fn new(
        stores: Option<Stores>,
        notes: SubmissionPolicy,
        comments: SubmissionPolicy,
    ) -> Self {
        Self {
            stores,
            notes,
            comments,
        }
    }

    fn stores(&self) -> Result<&Stores> {
        self.stores.as_ref().ok_or(AppError::ConfigurationMissing)
    }

    /// Fails with [`AppError::ConfigurationMissing`] when no store is wired
    pub fn ensure_configured(&self) -> Result<()> {
        self.stores().map(|_| ())
    }

    /// Most recent notes, newest first
    pub async fn list_notes(&self) -> Result<Vec<NoteResponseDto>> {
        let notes = self
            .stores()?
            .content
            .list_notes(MAX_NOTES_LISTED)
            .await?;

        Ok(notes.into_iter().map(Into::into).collect())
    }

    /// Comments on `note_id`, oldest first
    pub async fn list_comments(&self, note_id: Uuid) -> Result<Vec<CommentResponseDto>> {
        let comments = self
            .stores()?
            .content
            .list_comments(note_id, MAX_COMMENTS_LISTED)
            .await?;

        Ok(comments.into_iter().map(Into::into).collect())
    }

    /// `body` is the outcome of reading the request body; a read failure is
    /// reported only once the client has passed the rate limit.
    pub async fn create_note(&self, client_id: &str, body: Result<Bytes>) -> Result<NoteResponseDto> {
        let stores = self.stores()?;
        let content = Arc::clone(&stores.content);

        let note = self
            .submit::<CreateNoteDto, _, _, _>(stores, client_id, &self.notes, body, |mut fields| {
                async move {
                    let note = NewNote {
                        name: fields.take("name"),
                        message: fields.take("message"),
                        emoji: fields.take("emoji"),
                        color: fields.take("color"),
                    };
                    content.insert_note(&note).await
                }
            })
            .await?;

        tracing::info!("Note created: id={}, client={}", note.id, client_id);

        Ok(note.into())
    }

    pub async fn create_comment(
        &self,
        client_id: &str,
        note_id: Uuid,
        body: Result<Bytes>,
    ) -> Result<CommentResponseDto> {
        let stores = self.stores()?;
        let content = Arc::clone(&stores.content);

        let comment = self
            .submit::<CreateCommentDto, _, _, _>(
                stores,
                client_id,
                &self.comments,
                body,
                |mut fields| async move {
                    let comment = NewComment {
                        note_id,
                        name: fields.take("name"),
                        comment: fields.take("comment"),
                    };
                    content.insert_comment(&comment).await
                },
            )
            .await?;

        tracing::info!(
            "Comment created: id={}, note_id={}, client={}",
            comment.id,
            note_id,
            client_id
        );

        Ok(comment.into())
    }

    /// Rate limit, parse, validate, then persist, in that order.
    ///
    /// The rate-limit slot is consumed before the body is looked at, so
    /// oversized, malformed or invalid submissions still count against the
    /// client.
    async fn submit<P, T, F, Fut>(
        &self,
        stores: &Stores,
        client_id: &str,
        policy: &SubmissionPolicy,
        body: Result<Bytes>,
        persist: F,
    ) -> Result<T>
    where
        P: DeserializeOwned + SubmissionPayload,
        F: FnOnce(ValidatedFields) -> Fut,
        Fut: Future<Output = std::result::Result<T, StoreError>>,
    {
        let gate = SubmissionGate::new(Arc::clone(&stores.rate_limits));
        let decision = gate
            .check(client_id, &policy.rate_limit, Utc::now())
            .await?;

        if let GateDecision::Deny { retry_after_secs } = decision {
            tracing::warn!(
                "Rate limited {} submission: client={}, retry_after={}s",
                policy.kind,
                client_id,
                retry_after_secs
            );
            return Err(AppError::RateLimited {
                message: policy.rate_limited_message(retry_after_secs),
                retry_after_secs,
            });
        }

        let body = body?;
        let payload: P = serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("Unparseable {} payload from {}: {}", policy.kind, client_id, e);
            AppError::BadRequest(INVALID_PAYLOAD_MESSAGE.to_string())
        })?;

        let fields = validate(&payload, &policy.constraints)?;

        persist(fields).await.map_err(|e| {
            tracing::error!("Failed to store {}: {}", policy.kind, e);
            AppError::Store(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rate_limits::models::RateLimitPolicy;
    use crate::shared::test_helpers::{love_wall_service, FailingStore, InMemoryStore};

    const CLIENT: &str = "192.0.2.10";

    fn body(raw: &'static [u8]) -> Result<Bytes> {
        Ok(Bytes::from_static(raw))
    }

    fn service(store: &Arc<InMemoryStore>) -> LoveWallService {
        love_wall_service(Some(Stores::shared(store.clone())))
    }

    #[tokio::test]
    async fn test_note_defaults_emoji_and_color() {
        let store = Arc::new(InMemoryStore::default());
        let note = service(&store)
            .create_note(CLIENT, body(br#"{"name":"Ava","message":"Hi"}"#))
            .await
            .unwrap();

        assert_eq!(note.emoji, "💗");
        assert_eq!(note.color, "rose");
        assert_eq!(store.notes()[0].color, "rose");
    }

    #[tokio::test]
    async fn test_note_fields_are_trimmed() {
        let store = Arc::new(InMemoryStore::default());
        let note = service(&store)
            .create_note(
                CLIENT,
                body(r#"{"name":"  Ava ","message":" Hi  ","emoji":" ✨ ","color":" gold "}"#.as_bytes()),
            )
            .await
            .unwrap();

        assert_eq!(note.name, "Ava");
        assert_eq!(note.message, "Hi");
        assert_eq!(note.emoji, "✨");
        assert_eq!(note.color, "gold");
    }

    #[tokio::test]
    async fn test_invalid_submission_consumes_slot() {
        let store = Arc::new(InMemoryStore::default());
        let service = service(&store);

        let err = service
            .create_comment(CLIENT, Uuid::now_v7(), body(br#"{"name":"Ava","comment":""}"#))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.rate_limit(CLIENT).unwrap().count, 1);
        assert!(store.comments().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_consumes_slot() {
        let store = Arc::new(InMemoryStore::default());
        let err = service(&store)
            .create_note(CLIENT, body(b"{not json"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == INVALID_PAYLOAD_MESSAGE));
        assert_eq!(store.rate_limit(CLIENT).unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_oversized_body_consumes_slot() {
        let store = Arc::new(InMemoryStore::default());
        let err = service(&store)
            .create_note(CLIENT, Err(AppError::PayloadTooLarge))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge));
        assert_eq!(store.rate_limit(CLIENT).unwrap().count, 1);
        assert!(store.notes().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_malformed() {
        let store = Arc::new(InMemoryStore::default());
        let err = service(&store)
            .create_note(CLIENT, body(br#"{"name":42,"message":"Hi"}"#))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_rate_limited_skips_body() {
        let store = Arc::new(InMemoryStore::default());
        store.seed_rate_limit(CLIENT, 5, Some(Utc::now() + chrono::Duration::seconds(30)));

        let err = service(&store)
            .create_note(CLIENT, body(b"{not json"))
            .await
            .unwrap_err();

        match err {
            AppError::RateLimited {
                retry_after_secs, ..
            } => assert!((1..=30).contains(&retry_after_secs)),
            other => panic!("expected rate limit, got {:?}", other),
        }
        assert!(store.notes().is_empty());
    }

    #[tokio::test]
    async fn test_missing_configuration() {
        let service = love_wall_service(None);

        assert!(matches!(
            service.list_notes().await.unwrap_err(),
            AppError::ConfigurationMissing
        ));
        assert!(matches!(
            service.create_note(CLIENT, body(b"{}")).await.unwrap_err(),
            AppError::ConfigurationMissing
        ));
    }

    #[tokio::test]
    async fn test_store_failure_on_insert() {
        let store = Arc::new(InMemoryStore::default());
        let stores = Stores {
            content: Arc::new(FailingStore),
            rate_limits: store.clone(),
        };
        let service = LoveWallService::new(
            Some(stores),
            SubmissionPolicy::notes(RateLimitPolicy::new(60_000, 5)),
            SubmissionPolicy::comments(RateLimitPolicy::new(60_000, 10)),
        );

        let err = service
            .create_note(CLIENT, body(br#"{"name":"Ava","message":"Hi"}"#))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), FailingStore::MESSAGE);
        assert_eq!(store.rate_limit(CLIENT).unwrap().count, 1);
    }
}
