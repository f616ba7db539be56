mod comment_dto;
mod note_dto;

pub use comment_dto::{CommentResponseDto, CreateCommentDto};
pub use note_dto::{CreateNoteDto, NoteResponseDto};
