use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::validation::SubmissionPayload;

/// Request body for posting a note
///
/// Fields are checked after trimming; `emoji` and `color` fall back to
/// defaults when absent or blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteDto {
    /// Display name, 1-36 characters
    pub name: Option<String>,
    /// Note body, 1-240 characters
    pub message: Option<String>,
    #[schema(example = "💗")]
    pub emoji: Option<String>,
    #[schema(example = "rose")]
    pub color: Option<String>,
}

impl SubmissionPayload for CreateNoteDto {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "message" => self.message.as_deref(),
            "emoji" => self.emoji.as_deref(),
            "color" => self.color.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponseDto {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub emoji: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}
