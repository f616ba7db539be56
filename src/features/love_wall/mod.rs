//! Love wall: public notes with threaded comments.
//!
//! Posting is unauthenticated and rate limited per client identifier.
//! Reads are never rate limited.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/love-wall` | Up to 100 notes, newest first |
//! | POST | `/love-wall` | Post a note |
//! | GET | `/love-wall/{note_id}/comments` | Up to 50 comments, oldest first |
//! | POST | `/love-wall/{note_id}/comments` | Comment on a note |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{LoveWallService, SubmissionPolicy};
