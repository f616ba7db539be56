//! Per-content-type parameters of the rate-limited submission pipeline

use crate::features::rate_limits::models::RateLimitPolicy;
use crate::shared::constants::{
    DEFAULT_NOTE_COLOR, DEFAULT_NOTE_EMOJI, MAX_COMMENT_LENGTH, MAX_MESSAGE_LENGTH,
    MAX_NAME_LENGTH,
};
use crate::shared::validation::{ContentConstraints, FieldRule};

/// Everything that differs between posting a note and posting a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPolicy {
    /// Content type name used in logs
    pub kind: &'static str,
    pub rate_limit: RateLimitPolicy,
    /// Plural used in the rate-limit message, e.g. "posts"
    pub rate_limited_noun: &'static str,
    pub constraints: ContentConstraints,
}

impl SubmissionPolicy {
    pub fn notes(rate_limit: RateLimitPolicy) -> Self {
        Self {
            kind: "note",
            rate_limit,
            rate_limited_noun: "posts",
            constraints: ContentConstraints {
                rules: vec![
                    FieldRule::Required {
                        field: "name",
                        max_length: MAX_NAME_LENGTH,
                    },
                    FieldRule::Required {
                        field: "message",
                        max_length: MAX_MESSAGE_LENGTH,
                    },
                    FieldRule::Optional {
                        field: "emoji",
                        default: DEFAULT_NOTE_EMOJI,
                    },
                    FieldRule::Optional {
                        field: "color",
                        default: DEFAULT_NOTE_COLOR,
                    },
                ],
                missing_message: "Name and message are required.",
                too_long_message: "Message is too long.",
            },
        }
    }

    pub fn comments(rate_limit: RateLimitPolicy) -> Self {
        Self {
            kind: "comment",
            rate_limit,
            rate_limited_noun: "comments",
            constraints: ContentConstraints {
                rules: vec![
                    FieldRule::Required {
                        field: "name",
                        max_length: MAX_NAME_LENGTH,
                    },
                    FieldRule::Required {
                        field: "comment",
                        max_length: MAX_COMMENT_LENGTH,
                    },
                ],
                missing_message: "Name and comment are required.",
                too_long_message: "Comment is too long.",
            },
        }
    }

    pub fn rate_limited_message(&self, retry_after_secs: i64) -> String {
        format!(
            "Too many {}. Try again in {}s.",
            self.rate_limited_noun, retry_after_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message() {
        let notes = SubmissionPolicy::notes(RateLimitPolicy::new(60_000, 5));
        assert_eq!(
            notes.rate_limited_message(42),
            "Too many posts. Try again in 42s."
        );

        let comments = SubmissionPolicy::comments(RateLimitPolicy::new(60_000, 10));
        assert_eq!(
            comments.rate_limited_message(7),
            "Too many comments. Try again in 7s."
        );
    }
}
