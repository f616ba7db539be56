pub mod love_wall;
pub mod rate_limits;
