/// Table holding top-level notes
pub const NOTES_TABLE: &str = "love_wall";

/// Table holding per-note comments
pub const COMMENTS_TABLE: &str = "love_wall_comments";

/// Table holding one rate-limit row per client identifier
pub const RATE_LIMITS_TABLE: &str = "love_wall_rate_limits";

/// Hard cap on notes returned by the listing endpoint (newest first)
pub const MAX_NOTES_LISTED: i64 = 100;

/// Hard cap on comments returned per note (oldest first)
pub const MAX_COMMENTS_LISTED: i64 = 50;

/// Client identifier used when no proxy header names the caller
pub const UNKNOWN_CLIENT_ID: &str = "unknown";

// =============================================================================
// CONTENT DEFAULTS
// =============================================================================

pub const DEFAULT_NOTE_EMOJI: &str = "💗";

pub const DEFAULT_NOTE_COLOR: &str = "rose";

// =============================================================================
// FIELD LIMITS
// =============================================================================

pub const MAX_NAME_LENGTH: u64 = 36;

pub const MAX_MESSAGE_LENGTH: u64 = 240;

pub const MAX_COMMENT_LENGTH: u64 = 200;
