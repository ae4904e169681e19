//! Structural and field-level validation for inbound messages.
//!
//! Validators never panic on malformed input: every problem is reported as
//! a human-readable violation string. [`validate_complete`] runs the
//! structural check first (short-circuiting on structural failure), then
//! runs all field validators and accumulates every violation before
//! deciding validity.

use chrono::{DateTime, NaiveDateTime, Utc};
use palaver_types::config::ValidationLimits;
use palaver_types::message::Sender;
use serde_json::Value;

/// The five fields every inbound message must carry.
const REQUIRED_FIELDS: [&str; 5] = ["message_id", "session_id", "content", "timestamp", "sender"];

/// Accepted formats for timestamps without a UTC offset; parsed values are
/// treated as already being UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// A message that passed every check, coerced to canonical types.
///
/// `content` is trimmed but not yet filtered; the pipeline keeps the
/// trimmed text as `original_content` and filters a copy.
#[derive(Debug, Clone)]
pub struct ValidatedMessage {
    pub message_id: String,
    pub session_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
}

fn is_message_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn is_session_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}

/// Validate a message identifier: non-empty, bounded length, restricted
/// charset (letters, digits, `-`, `_`, `.`).
pub fn validate_message_id(value: &str, limits: &ValidationLimits) -> Vec<String> {
    let mut violations = Vec::new();

    if value.trim().is_empty() {
        violations.push("message_id cannot be empty".to_string());
    }
    if value.chars().count() > limits.max_message_id_length {
        violations.push(format!(
            "message_id exceeds maximum length of {} characters",
            limits.max_message_id_length
        ));
    }
    if !value.is_empty() && !value.chars().all(is_message_id_char) {
        violations.push(
            "message_id may only contain letters, digits, hyphens, underscores, and dots"
                .to_string(),
        );
    }

    violations
}

/// Validate a session identifier: same shape as the message identifier but
/// without dots in the charset.
pub fn validate_session_id(value: &str, limits: &ValidationLimits) -> Vec<String> {
    let mut violations = Vec::new();

    if value.trim().is_empty() {
        violations.push("session_id cannot be empty".to_string());
    }
    if value.chars().count() > limits.max_session_id_length {
        violations.push(format!(
            "session_id exceeds maximum length of {} characters",
            limits.max_session_id_length
        ));
    }
    if !value.is_empty() && !value.chars().all(is_session_id_char) {
        violations.push(
            "session_id may only contain letters, digits, hyphens, and underscores".to_string(),
        );
    }

    violations
}

/// Validate message content: non-empty after trimming, bounded length.
///
/// Length is counted in characters over the trimmed text.
pub fn validate_content(value: &str, limits: &ValidationLimits) -> Vec<String> {
    let trimmed = value.trim();
    let mut violations = Vec::new();

    if trimmed.is_empty() {
        violations.push("content cannot be empty".to_string());
    }
    if trimmed.chars().count() > limits.max_content_length {
        violations.push(format!(
            "content exceeds maximum length of {} characters",
            limits.max_content_length
        ));
    }

    violations
}

/// Validate the sender value against the allowed enum.
pub fn validate_sender(value: &str) -> Vec<String> {
    if value.parse::<Sender>().is_ok() {
        Vec::new()
    } else {
        vec!["sender must be one of: user, system".to_string()]
    }
}

/// Validate an already-parsed timestamp: it must not lie in the future.
pub fn validate_timestamp(timestamp: DateTime<Utc>) -> Vec<String> {
    if timestamp > Utc::now() {
        vec!["timestamp cannot be in the future".to_string()]
    } else {
        Vec::new()
    }
}

/// Parse an ISO 8601 timestamp string.
///
/// Offset-carrying input (RFC 3339, including `Z`) is normalized to UTC;
/// naive input is treated as already being UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Check the basic shape of a raw message: a JSON object carrying all five
/// required fields, with textual content and sender.
pub fn validate_structure(raw: &Value) -> Vec<String> {
    let Some(object) = raw.as_object() else {
        return vec!["message must be a JSON object".to_string()];
    };

    let mut violations = Vec::new();

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            violations.push(format!("missing required field: {field}"));
        }
    }

    if let Some(content) = object.get("content")
        && !content.is_string()
    {
        violations.push("content must be a string".to_string());
    }
    if let Some(sender) = object.get("sender")
        && !sender.is_string()
    {
        violations.push("sender must be a string".to_string());
    }

    violations
}

/// Run the full validation sequence over a raw message.
///
/// Structural violations short-circuit: none of the field validators run
/// when the shape is wrong. On a sound structure, all field validators run
/// and their violations accumulate; only a clean pass yields the
/// canonicalized [`ValidatedMessage`].
pub fn validate_complete(
    raw: &Value,
    limits: &ValidationLimits,
) -> Result<ValidatedMessage, Vec<String>> {
    let structural = validate_structure(raw);
    if !structural.is_empty() {
        return Err(structural);
    }

    let Some(object) = raw.as_object() else {
        // validate_structure only passes objects; anything else is structural.
        return Err(vec!["message must be a JSON object".to_string()]);
    };

    let mut violations = Vec::new();

    let message_id = match object.get("message_id").and_then(Value::as_str) {
        Some(value) => {
            violations.extend(validate_message_id(value, limits));
            Some(value)
        }
        None => {
            violations.push("message_id must be a string".to_string());
            None
        }
    };

    let session_id = match object.get("session_id").and_then(Value::as_str) {
        Some(value) => {
            violations.extend(validate_session_id(value, limits));
            Some(value)
        }
        None => {
            violations.push("session_id must be a string".to_string());
            None
        }
    };

    // Guaranteed strings by validate_structure.
    let content = object
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default();
    violations.extend(validate_content(content, limits));

    let sender_raw = object
        .get("sender")
        .and_then(Value::as_str)
        .unwrap_or_default();
    violations.extend(validate_sender(sender_raw));

    let timestamp = match object.get("timestamp").and_then(Value::as_str) {
        Some(value) => match parse_timestamp(value) {
            Some(parsed) => {
                violations.extend(validate_timestamp(parsed));
                Some(parsed)
            }
            None => {
                violations.push("timestamp must be a valid ISO 8601 date-time".to_string());
                None
            }
        },
        None => {
            violations.push("timestamp must be a string in ISO 8601 format".to_string());
            None
        }
    };

    if !violations.is_empty() {
        return Err(violations);
    }

    // Zero violations means every Option above is Some; guard anyway.
    let (Some(message_id), Some(session_id), Some(timestamp), Ok(sender)) =
        (message_id, session_id, timestamp, sender_raw.parse::<Sender>())
    else {
        return Err(vec!["message could not be canonicalized".to_string()]);
    };

    Ok(ValidatedMessage {
        message_id: message_id.to_string(),
        session_id: session_id.to_string(),
        content: content.trim().to_string(),
        timestamp,
        sender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn limits() -> ValidationLimits {
        ValidationLimits::default()
    }

    fn valid_raw() -> Value {
        json!({
            "message_id": "msg-001",
            "session_id": "session_1",
            "content": "  hello world  ",
            "timestamp": "2024-05-01T10:30:00Z",
            "sender": "user",
        })
    }

    #[test]
    fn test_valid_message_canonicalized() {
        let validated = validate_complete(&valid_raw(), &limits()).unwrap();
        assert_eq!(validated.message_id, "msg-001");
        assert_eq!(validated.session_id, "session_1");
        assert_eq!(validated.content, "hello world");
        assert_eq!(validated.sender, Sender::User);
        assert_eq!(validated.timestamp.to_rfc3339(), "2024-05-01T10:30:00+00:00");
    }

    #[test]
    fn test_message_id_allows_dots() {
        assert!(validate_message_id("msg.v2.001", &limits()).is_empty());
    }

    #[test]
    fn test_message_id_rejects_bad_charset() {
        let violations = validate_message_id("msg 001!", &limits());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("may only contain"));
    }

    #[test]
    fn test_message_id_empty() {
        let violations = validate_message_id("", &limits());
        assert_eq!(violations, vec!["message_id cannot be empty".to_string()]);
    }

    #[test]
    fn test_message_id_whitespace_only_reports_both() {
        // Whitespace-only fails the emptiness check and the charset check.
        let violations = validate_message_id("   ", &limits());
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_message_id_too_long() {
        let long = "a".repeat(101);
        let violations = validate_message_id(&long, &limits());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("maximum length of 100"));
    }

    #[test]
    fn test_session_id_rejects_dot() {
        let violations = validate_session_id("session.1", &limits());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("may only contain"));
    }

    #[test]
    fn test_content_empty_after_trim() {
        let violations = validate_content("   \n  ", &limits());
        assert_eq!(violations, vec!["content cannot be empty".to_string()]);
    }

    #[test]
    fn test_content_over_limit() {
        let violations = validate_content(&"x".repeat(5001), &limits());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("5000"));
    }

    #[test]
    fn test_content_length_counts_characters_not_bytes() {
        // 5000 two-byte characters stay within the limit.
        let content = "é".repeat(5000);
        assert!(validate_content(&content, &limits()).is_empty());
    }

    #[test]
    fn test_sender_rejects_unknown_value() {
        let violations = validate_sender("assistant");
        assert_eq!(violations, vec!["sender must be one of: user, system".to_string()]);
    }

    #[test]
    fn test_timestamp_future_rejected() {
        let future = Utc::now() + Duration::days(1);
        let violations = validate_timestamp(future);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("timestamp"));
    }

    #[test]
    fn test_timestamp_now_accepted() {
        assert!(validate_timestamp(Utc::now() - Duration::seconds(1)).is_empty());
    }

    #[test]
    fn test_parse_timestamp_naive_treated_as_utc() {
        let parsed = parse_timestamp("2024-05-01T10:30:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T10:30:00+00:00");

        let with_space = parse_timestamp("2024-05-01 10:30:00").unwrap();
        assert_eq!(with_space, parsed);
    }

    #[test]
    fn test_parse_timestamp_offset_normalized() {
        let parsed = parse_timestamp("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        assert!(parse_timestamp("2024-05-01T10:30:00.123").is_some());
        assert!(parse_timestamp("2024-05-01T10:30:00.123Z").is_some());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_structure_missing_fields() {
        let violations = validate_structure(&json!({"content": "hi"}));
        assert_eq!(violations.len(), 4);
        assert!(violations.contains(&"missing required field: message_id".to_string()));
        assert!(violations.contains(&"missing required field: sender".to_string()));
    }

    #[test]
    fn test_structure_non_textual_content_and_sender() {
        let raw = json!({
            "message_id": "m1",
            "session_id": "s1",
            "content": 42,
            "timestamp": "2024-05-01T10:30:00Z",
            "sender": ["user"],
        });
        let violations = validate_structure(&raw);
        assert!(violations.contains(&"content must be a string".to_string()));
        assert!(violations.contains(&"sender must be a string".to_string()));
    }

    #[test]
    fn test_structure_rejects_non_object() {
        let violations = validate_structure(&json!("just a string"));
        assert_eq!(violations, vec!["message must be a JSON object".to_string()]);
    }

    #[test]
    fn test_complete_structural_failure_short_circuits() {
        // Missing sender is structural; the field validators must not run,
        // so no "sender must be one of" violation appears.
        let raw = json!({
            "message_id": "m1",
            "session_id": "s1",
            "content": "hello",
            "timestamp": "2024-05-01T10:30:00Z",
        });
        let violations = validate_complete(&raw, &limits()).unwrap_err();
        assert_eq!(violations, vec!["missing required field: sender".to_string()]);
    }

    #[test]
    fn test_complete_accumulates_field_violations() {
        // Invalid sender AND over-length content: both reported, not just
        // the first encountered.
        let raw = json!({
            "message_id": "m1",
            "session_id": "s1",
            "content": "x".repeat(5001),
            "timestamp": "2024-05-01T10:30:00Z",
            "sender": "bot",
        });
        let violations = validate_complete(&raw, &limits()).unwrap_err();
        assert!(violations.len() >= 2);
        assert!(violations.iter().any(|v| v.contains("sender")));
        assert!(violations.iter().any(|v| v.contains("content")));
    }

    #[test]
    fn test_complete_non_string_identifier_is_field_violation() {
        let raw = json!({
            "message_id": 17,
            "session_id": "s1",
            "content": "hello",
            "timestamp": "2024-05-01T10:30:00Z",
            "sender": "user",
        });
        let violations = validate_complete(&raw, &limits()).unwrap_err();
        assert!(violations.contains(&"message_id must be a string".to_string()));
    }

    #[test]
    fn test_complete_bad_timestamp_reported() {
        let raw = json!({
            "message_id": "m1",
            "session_id": "s1",
            "content": "hello",
            "timestamp": "not-a-date",
            "sender": "user",
        });
        let violations = validate_complete(&raw, &limits()).unwrap_err();
        assert_eq!(
            violations,
            vec!["timestamp must be a valid ISO 8601 date-time".to_string()]
        );
    }
}
