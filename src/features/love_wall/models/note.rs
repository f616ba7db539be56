use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::love_wall::dtos::NoteResponseDto;

/// Stored love-wall note. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub emoji: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Validated note ready for insert; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub name: String,
    pub message: String,
    pub emoji: String,
    pub color: String,
}

impl From<Note> for NoteResponseDto {
    fn from(n: Note) -> Self {
        Self {
            id: n.id,
            name: n.name,
            message: n.message,
            emoji: n.emoji,
            color: n.color,
            created_at: n.created_at,
        }
    }
}
