use chrono::{DateTime, Duration, Utc};
use validator::Validate;

/// Per-client request counter for the current fixed window, as read back
/// from the row keyed by client identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Accepted requests in the current window, always >= 1
    pub count: i32,
    /// Window expiry. `None` when the stored value could not be parsed.
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitRecord {
    /// Parse a stored expiry timestamp (RFC 3339)
    pub fn parse_reset_at(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Longest accepted window: one week
pub const MAX_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Fixed-window limit applied to one kind of submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct RateLimitPolicy {
    #[validate(range(
        min = 1,
        max = MAX_WINDOW_MS,
        message = "Window must be between 1 ms and one week"
    ))]
    pub window_ms: i64,

    #[validate(range(min = 1, message = "Max requests must be at least 1"))]
    pub max_requests: i32,
}

impl RateLimitPolicy {
    pub fn new(window_ms: i64, max_requests: i32) -> Self {
        Self {
            window_ms,
            max_requests,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::milliseconds(self.window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_reset_at() {
        let expected = Utc.with_ymd_and_hms(2026, 2, 14, 9, 30, 0).unwrap();
        assert_eq!(
            RateLimitRecord::parse_reset_at("2026-02-14T09:30:00.000Z"),
            Some(expected)
        );
        assert_eq!(
            RateLimitRecord::parse_reset_at("2026-02-14T16:30:00+07:00"),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_reset_at_garbage() {
        assert_eq!(RateLimitRecord::parse_reset_at("soon"), None);
        assert_eq!(RateLimitRecord::parse_reset_at(""), None);
    }

    #[test]
    fn test_policy_validation() {
        assert!(RateLimitPolicy::new(60_000, 5).validate().is_ok());
        assert!(RateLimitPolicy::new(0, 5).validate().is_err());
        assert!(RateLimitPolicy::new(60_000, 0).validate().is_err());
        assert!(RateLimitPolicy::new(MAX_WINDOW_MS, 5).validate().is_ok());
        assert!(RateLimitPolicy::new(MAX_WINDOW_MS + 1, 5).validate().is_err());
        assert!(RateLimitPolicy::new(i64::MAX, 5).validate().is_err());
    }
}
