use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{ClientId, SubmissionBody};
use crate::features::love_wall::dtos::{CreateNoteDto, NoteResponseDto};
use crate::features::love_wall::services::LoveWallService;
use crate::shared::types::ApiResponse;

/// List notes on the wall
///
/// Returns at most 100 notes, newest first. Not rate limited.
#[utoipa::path(
    get,
    path = "/love-wall",
    responses(
        (status = 200, description = "Notes, newest first", body = ApiResponse<Vec<NoteResponseDto>>),
        (status = 500, description = "Store unavailable or not configured")
    ),
    tag = "love-wall"
)]
pub async fn list_notes(
    State(service): State<Arc<LoveWallService>>,
) -> Result<Json<ApiResponse<Vec<NoteResponseDto>>>> {
    let notes = service.list_notes().await?;
    Ok(Json(ApiResponse::success(notes)))
}

/// Post a note
///
/// The body is read only after the caller passes the rate limit, so
/// malformed submissions still use up a slot.
#[utoipa::path(
    post,
    path = "/love-wall",
    request_body = CreateNoteDto,
    responses(
        (status = 201, description = "Note created", body = ApiResponse<NoteResponseDto>),
        (status = 400, description = "Invalid JSON, missing fields or content too long"),
        (status = 413, description = "Body larger than the configured limit"),
        (status = 429, description = "Too many posts from this client",
            headers(("Retry-After" = i64, description = "Seconds until the window resets"))),
        (status = 500, description = "Store unavailable or not configured")
    ),
    tag = "love-wall"
)]
pub async fn create_note(
    State(service): State<Arc<LoveWallService>>,
    client_id: ClientId,
    SubmissionBody(body): SubmissionBody,
) -> Result<(StatusCode, Json<ApiResponse<NoteResponseDto>>)> {
    let note = service.create_note(client_id.as_str(), body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(note))))
}
