use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppPath, AppPathRejection, ClientId, SubmissionBody};
use crate::features::love_wall::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::love_wall::services::LoveWallService;
use crate::shared::types::ApiResponse;

/// List comments on a note
///
/// Returns at most 50 comments, oldest first. Not rate limited. A missing
/// store configuration is reported before a malformed note ID.
#[utoipa::path(
    get,
    path = "/love-wall/{note_id}/comments",
    params(
        ("note_id" = Uuid, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 400, description = "Malformed note ID"),
        (status = 500, description = "Store unavailable or not configured")
    ),
    tag = "love-wall"
)]
pub async fn list_comments(
    State(service): State<Arc<LoveWallService>>,
    note_id: std::result::Result<AppPath<Uuid>, AppPathRejection>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    service.ensure_configured()?;
    let AppPath(note_id) = note_id?;

    let comments = service.list_comments(note_id).await?;
    Ok(Json(ApiResponse::success(comments)))
}

/// Comment on a note
#[utoipa::path(
    post,
    path = "/love-wall/{note_id}/comments",
    params(
        ("note_id" = Uuid, Path, description = "Note ID")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Malformed note ID, invalid JSON, missing fields or content too long"),
        (status = 413, description = "Body larger than the configured limit"),
        (status = 429, description = "Too many comments from this client",
            headers(("Retry-After" = i64, description = "Seconds until the window resets"))),
        (status = 500, description = "Store unavailable or not configured")
    ),
    tag = "love-wall"
)]
pub async fn create_comment(
    State(service): State<Arc<LoveWallService>>,
    note_id: std::result::Result<AppPath<Uuid>, AppPathRejection>,
    client_id: ClientId,
    SubmissionBody(body): SubmissionBody,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    service.ensure_configured()?;
    let AppPath(note_id) = note_id?;

    let comment = service
        .create_comment(client_id.as_str(), note_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(comment))))
}
