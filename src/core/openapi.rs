use utoipa::{Modify, OpenApi};

use crate::features::love_wall::{dtos as love_wall_dtos, handlers as love_wall_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        love_wall_handlers::list_notes,
        love_wall_handlers::create_note,
        love_wall_handlers::list_comments,
        love_wall_handlers::create_comment,
    ),
    components(
        schemas(
            love_wall_dtos::CreateNoteDto,
            love_wall_dtos::NoteResponseDto,
            love_wall_dtos::CreateCommentDto,
            love_wall_dtos::CommentResponseDto,
            ApiResponse<Vec<love_wall_dtos::NoteResponseDto>>,
            ApiResponse<love_wall_dtos::NoteResponseDto>,
            ApiResponse<Vec<love_wall_dtos::CommentResponseDto>>,
            ApiResponse<love_wall_dtos::CommentResponseDto>,
        )
    ),
    tags(
        (name = "love-wall", description = "Public notes and comments, rate limited per client IP"),
    ),
    info(
        title = "Love Wall API",
        version = "0.1.0",
        description = "API documentation for the love wall",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
