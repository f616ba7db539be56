mod comment;
mod note;

pub use comment::{Comment, NewComment};
pub use note::{NewNote, Note};
