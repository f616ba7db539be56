mod rate_limit_record;

pub use rate_limit_record::{RateLimitPolicy, RateLimitRecord};
