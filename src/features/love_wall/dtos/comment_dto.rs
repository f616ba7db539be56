use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::validation::SubmissionPayload;

/// Request body for commenting on a note
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentDto {
    /// Display name, 1-36 characters
    pub name: Option<String>,
    /// Comment body, 1-200 characters
    pub comment: Option<String>,
}

impl SubmissionPayload for CreateCommentDto {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "comment" => self.comment.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub note_id: Uuid,
    pub name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
