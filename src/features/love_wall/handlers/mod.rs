pub mod comment_handler;
pub mod note_handler;

pub use comment_handler::*;
pub use note_handler::*;
