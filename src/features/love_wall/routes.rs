use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::love_wall::handlers;
use crate::features::love_wall::services::LoveWallService;

/// Create routes for the love wall
///
/// Public: no authentication. Only the POST routes are rate limited.
pub fn routes(service: Arc<LoveWallService>) -> Router {
    Router::new()
        .route(
            "/love-wall",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route(
            "/love-wall/{note_id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .with_state(service)
}
