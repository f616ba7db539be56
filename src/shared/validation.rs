//! Content validation for user submitted payloads.
//!
//! Validation is a pure function of the payload and its constraints:
//! every field is trimmed, required fields must be non-empty, required
//! fields must fit their maximum length (counted in UTF-16 code units, the
//! unit browsers use for `maxLength`), and optional
//! fields fall back to a configured default when absent or blank.

use std::collections::HashMap;

/// How a single payload field is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Must be non-empty after trimming and at most `max_length` UTF-16 units
    Required {
        field: &'static str,
        max_length: u64,
    },
    /// Trimmed only; replaced by `default` when absent or blank
    Optional {
        field: &'static str,
        default: &'static str,
    },
}

impl FieldRule {
    pub fn field(&self) -> &'static str {
        match self {
            FieldRule::Required { field, .. } | FieldRule::Optional { field, .. } => field,
        }
    }
}

/// Field rules plus the messages reported when they are violated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConstraints {
    pub rules: Vec<FieldRule>,
    pub missing_message: &'static str,
    pub too_long_message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("{0}")]
    MissingRequiredFields(&'static str),

    #[error("{0}")]
    ContentTooLong(&'static str),
}

/// Payloads expose their raw string fields by name.
pub trait SubmissionPayload {
    fn field(&self, name: &str) -> Option<&str>;
}

/// Trimmed, defaulted field values keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedFields(HashMap<&'static str, String>);

impl ValidatedFields {
    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Move a field out. Fields named by the constraints are always present.
    pub fn take(&mut self, field: &str) -> String {
        self.0.remove(field).unwrap_or_default()
    }
}

/// Length as a browser reports it: characters outside the Basic
/// Multilingual Plane (most emoji) count as two.
fn utf16_len(value: &str) -> u64 {
    value.encode_utf16().count() as u64
}

/// Validate `payload` against `constraints`.
///
/// A missing required field is reported before any length violation, even
/// when another field is also too long.
pub fn validate<P>(
    payload: &P,
    constraints: &ContentConstraints,
) -> Result<ValidatedFields, ValidationFailure>
where
    P: SubmissionPayload + ?Sized,
{
    let trimmed: Vec<(FieldRule, String)> = constraints
        .rules
        .iter()
        .map(|rule| {
            let value = payload
                .field(rule.field())
                .map(|raw| raw.trim().to_string())
                .unwrap_or_default();
            (*rule, value)
        })
        .collect();

    let missing = trimmed
        .iter()
        .any(|(rule, value)| matches!(rule, FieldRule::Required { .. }) && value.is_empty());
    if missing {
        return Err(ValidationFailure::MissingRequiredFields(
            constraints.missing_message,
        ));
    }

    let too_long = trimmed.iter().any(|(rule, value)| match rule {
        FieldRule::Required { max_length, .. } => utf16_len(value) > *max_length,
        FieldRule::Optional { .. } => false,
    });
    if too_long {
        return Err(ValidationFailure::ContentTooLong(
            constraints.too_long_message,
        ));
    }

    let fields = trimmed
        .into_iter()
        .map(|(rule, value)| match rule {
            FieldRule::Optional { field, default } if value.is_empty() => {
                (field, default.to_string())
            }
            _ => (rule.field(), value),
        })
        .collect();

    Ok(ValidatedFields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Payload(Vec<(&'static str, &'static str)>);

    impl SubmissionPayload for Payload {
        fn field(&self, name: &str) -> Option<&str> {
            self.0
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
        }
    }

    fn constraints() -> ContentConstraints {
        ContentConstraints {
            rules: vec![
                FieldRule::Required {
                    field: "name",
                    max_length: 5,
                },
                FieldRule::Required {
                    field: "body",
                    max_length: 10,
                },
                FieldRule::Optional {
                    field: "tag",
                    default: "plain",
                },
            ],
            missing_message: "missing",
            too_long_message: "too long",
        }
    }

    #[test]
    fn test_trims_and_defaults() {
        let payload = Payload(vec![("name", "  Ava "), ("body", "\thello\n")]);
        let mut fields = validate(&payload, &constraints()).unwrap();

        assert_eq!(fields.get("name"), Some("Ava"));
        assert_eq!(fields.take("body"), "hello");
        assert_eq!(fields.get("tag"), Some("plain"));
    }

    #[test]
    fn test_blank_optional_gets_default() {
        let payload = Payload(vec![("name", "Ava"), ("body", "hi"), ("tag", "   ")]);
        let fields = validate(&payload, &constraints()).unwrap();
        assert_eq!(fields.get("tag"), Some("plain"));
    }

    #[test]
    fn test_optional_is_kept_trimmed() {
        let payload = Payload(vec![("name", "Ava"), ("body", "hi"), ("tag", " gold ")]);
        let fields = validate(&payload, &constraints()).unwrap();
        assert_eq!(fields.get("tag"), Some("gold"));
    }

    #[test]
    fn test_whitespace_only_required_is_missing() {
        let payload = Payload(vec![("name", "   "), ("body", "hi")]);
        assert_eq!(
            validate(&payload, &constraints()),
            Err(ValidationFailure::MissingRequiredFields("missing"))
        );
    }

    #[test]
    fn test_absent_required_is_missing() {
        let payload = Payload(vec![("name", "Ava")]);
        assert_eq!(
            validate(&payload, &constraints()),
            Err(ValidationFailure::MissingRequiredFields("missing"))
        );
    }

    #[test]
    fn test_missing_wins_over_too_long() {
        let payload = Payload(vec![("name", "far too long a name"), ("body", "")]);
        assert_eq!(
            validate(&payload, &constraints()),
            Err(ValidationFailure::MissingRequiredFields("missing"))
        );
    }

    #[test]
    fn test_length_boundary() {
        let at_limit = Payload(vec![("name", "abcde"), ("body", "0123456789")]);
        assert!(validate(&at_limit, &constraints()).is_ok());

        let over = Payload(vec![("name", "abcdef"), ("body", "hi")]);
        assert_eq!(
            validate(&over, &constraints()),
            Err(ValidationFailure::ContentTooLong("too long"))
        );
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // é is one unit, 💗 (U+1F497) is a surrogate pair
        let payload = Payload(vec![("name", "ééééé"), ("body", "💗💗💗💗💗")]);
        assert!(validate(&payload, &constraints()).is_ok());

        let payload = Payload(vec![("name", "💗💗💗"), ("body", "hi")]);
        assert_eq!(
            validate(&payload, &constraints()),
            Err(ValidationFailure::ContentTooLong("too long"))
        );
    }

    #[test]
    fn test_utf16_len() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("é"), 1);
        assert_eq!(utf16_len("💗"), 2);
    }

    #[test]
    fn test_length_measured_after_trim() {
        let payload = Payload(vec![("name", "   abcde   "), ("body", "hi")]);
        assert!(validate(&payload, &constraints()).is_ok());
    }
}
