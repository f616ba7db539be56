mod love_wall_service;
mod submission;

pub use love_wall_service::LoveWallService;
pub use submission::SubmissionPolicy;
