use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::love_wall::dtos::CommentResponseDto;

/// Stored comment on a note. `note_id` is only used for filtering.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub note_id: Uuid,
    pub name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub note_id: Uuid,
    pub name: String,
    pub comment: String,
}

impl From<Comment> for CommentResponseDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            note_id: c.note_id,
            name: c.name,
            comment: c.comment,
            created_at: c.created_at,
        }
    }
}
