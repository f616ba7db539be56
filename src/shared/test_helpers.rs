//! Store doubles and server builders shared by unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::features::love_wall::models::{Comment, NewComment, NewNote, Note};
use crate::features::love_wall::{routes, LoveWallService, SubmissionPolicy};
use crate::features::rate_limits::models::{RateLimitPolicy, RateLimitRecord};
use crate::modules::store::{ContentStore, RateLimitStore, StoreError, Stores};

#[derive(Default)]
struct State {
    rate_limits: HashMap<String, RateLimitRecord>,
    notes: Vec<Note>,
    comments: Vec<Comment>,
    last_created_at: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing creation times, so ordering assertions never tie
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

/// Store double keeping every table in memory
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn rate_limit(&self, client_id: &str) -> Option<RateLimitRecord> {
        self.state.lock().unwrap().rate_limits.get(client_id).cloned()
    }

    pub fn seed_rate_limit(&self, client_id: &str, count: i32, reset_at: Option<DateTime<Utc>>) {
        self.state.lock().unwrap().rate_limits.insert(
            client_id.to_string(),
            RateLimitRecord {
                count,
                reset_at,
            },
        );
    }

    pub fn seed_note(&self, note: Note) {
        self.state.lock().unwrap().notes.push(note);
    }

    pub fn seed_comment(&self, comment: Comment) {
        self.state.lock().unwrap().comments.push(comment);
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.lock().unwrap().notes.clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.state.lock().unwrap().comments.clone()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryStore {
    async fn find_rate_limit(
        &self,
        client_id: &str,
    ) -> Result<Option<RateLimitRecord>, StoreError> {
        Ok(self.rate_limit(client_id))
    }

    async fn insert_rate_limit(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.rate_limits.contains_key(client_id) {
            return Err(StoreError::Rejected {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }
        state.rate_limits.insert(
            client_id.to_string(),
            RateLimitRecord {
                count,
                reset_at: Some(reset_at),
            },
        );
        Ok(())
    }

    async fn restart_window(
        &self,
        client_id: &str,
        count: i32,
        reset_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if let Some(record) = self.state.lock().unwrap().rate_limits.get_mut(client_id) {
            record.count = count;
            record.reset_at = Some(reset_at);
        }
        Ok(())
    }

    async fn update_count(&self, client_id: &str, count: i32) -> Result<(), StoreError> {
        if let Some(record) = self.state.lock().unwrap().rate_limits.get_mut(client_id) {
            record.count = count;
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn list_notes(&self, limit: i64) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.notes();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notes.truncate(limit as usize);
        Ok(notes)
    }

    async fn insert_note(&self, note: &NewNote) -> Result<Note, StoreError> {
        let mut state = self.state.lock().unwrap();
        let created = Note {
            id: Uuid::now_v7(),
            name: note.name.clone(),
            message: note.message.clone(),
            emoji: note.emoji.clone(),
            color: note.color.clone(),
            created_at: state.next_created_at(),
        };
        state.notes.push(created.clone());
        Ok(created)
    }

    async fn list_comments(&self, note_id: Uuid, limit: i64) -> Result<Vec<Comment>, StoreError> {
        let mut comments: Vec<Comment> = self
            .comments()
            .into_iter()
            .filter(|c| c.note_id == note_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        comments.truncate(limit as usize);
        Ok(comments)
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let mut state = self.state.lock().unwrap();
        let created = Comment {
            id: Uuid::now_v7(),
            note_id: comment.note_id,
            name: comment.name.clone(),
            comment: comment.comment.clone(),
            created_at: state.next_created_at(),
        };
        state.comments.push(created.clone());
        Ok(created)
    }
}

/// Store double where every call fails
pub struct FailingStore;

impl FailingStore {
    pub const MESSAGE: &'static str = "upstream store unavailable";

    fn error() -> StoreError {
        StoreError::Rejected {
            status: 503,
            message: Self::MESSAGE.to_string(),
        }
    }
}

#[async_trait]
impl RateLimitStore for FailingStore {
    async fn find_rate_limit(&self, _: &str) -> Result<Option<RateLimitRecord>, StoreError> {
        Err(Self::error())
    }

    async fn insert_rate_limit(&self, _: &str, _: i32, _: DateTime<Utc>) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn restart_window(&self, _: &str, _: i32, _: DateTime<Utc>) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn update_count(&self, _: &str, _: i32) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn list_notes(&self, _: i64) -> Result<Vec<Note>, StoreError> {
        Err(Self::error())
    }

    async fn insert_note(&self, _: &NewNote) -> Result<Note, StoreError> {
        Err(Self::error())
    }

    async fn list_comments(&self, _: Uuid, _: i64) -> Result<Vec<Comment>, StoreError> {
        Err(Self::error())
    }

    async fn insert_comment(&self, _: &NewComment) -> Result<Comment, StoreError> {
        Err(Self::error())
    }
}

/// Service wired with the default note (5/min) and comment (10/min) limits
pub fn love_wall_service(stores: Option<Stores>) -> LoveWallService {
    LoveWallService::new(
        stores,
        SubmissionPolicy::notes(RateLimitPolicy::new(60_000, 5)),
        SubmissionPolicy::comments(RateLimitPolicy::new(60_000, 10)),
    )
}

/// Test server over the love-wall routes backed by `store`
pub fn server_with_store(store: Arc<InMemoryStore>) -> TestServer {
    server_with(Some(Stores::shared(store)))
}

pub fn server_with(stores: Option<Stores>) -> TestServer {
    let router = routes::routes(Arc::new(love_wall_service(stores)));
    TestServer::new(router).unwrap()
}
