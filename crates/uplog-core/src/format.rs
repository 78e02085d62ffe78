//! Event formatting helpers
//!
//! Messages are tagged with their kind before they ever reach the queue;
//! caller params are flattened to a single string at record time. Both the
//! delivered log line and the recorded error description are rebuilt from
//! those two strings at flush time.

use serde_json::Value;

use crate::domain::{LogEntry, LogKind};

/// Sentinel emitted when a param cannot be serialized.
pub const UNSERIALIZABLE: &str = "<unserializable>";

/// Prefixes the bracketed kind tag to a caller message.
pub fn tag_message(kind: LogKind, message: &str) -> String {
    format!("{} {}", kind.tag(), message)
}

/// Flattens caller params to a single space-joined string.
///
/// Strings are rendered plain; every other value is serialized to its
/// canonical JSON text. A serialization failure yields the
/// [`UNSERIALIZABLE`] sentinel rather than an error.
pub fn flatten_params(params: &[Value]) -> String {
    params
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => {
                serde_json::to_string(other).unwrap_or_else(|_| UNSERIALIZABLE.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The log line delivered to the remote sink for an entry.
pub fn delivery_line(entry: &LogEntry) -> String {
    if entry.params.is_empty() {
        entry.message.clone()
    } else {
        format!("{} {}", entry.message, entry.params)
    }
}

/// The description reported alongside an error entry's log line.
pub fn error_description(entry: &LogEntry) -> String {
    delivery_line(entry)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tag_message_prefixes_kind() {
        assert_eq!(tag_message(LogKind::Log, "hello"), "[LOG] hello");
        assert_eq!(tag_message(LogKind::Warn, "slow"), "[WARN] slow");
        assert_eq!(tag_message(LogKind::Error, "boom"), "[ERROR] boom");
    }

    #[test]
    fn test_flatten_params_joins_with_spaces() {
        let params = vec![json!("plain"), json!(42), json!({"key": "value"})];
        assert_eq!(flatten_params(&params), r#"plain 42 {"key":"value"}"#);
    }

    #[test]
    fn test_flatten_params_strings_are_unquoted() {
        assert_eq!(flatten_params(&[json!("a b")]), "a b");
    }

    #[test]
    fn test_flatten_params_null_and_bool() {
        let params = vec![json!(null), json!(true)];
        assert_eq!(flatten_params(&params), "null true");
    }

    #[test]
    fn test_flatten_params_empty() {
        assert_eq!(flatten_params(&[]), "");
    }

    #[test]
    fn test_delivery_line_with_and_without_params() {
        let with = LogEntry::new(LogKind::Log, "[LOG] msg".to_string(), "p1 p2".to_string());
        assert_eq!(delivery_line(&with), "[LOG] msg p1 p2");

        let without = LogEntry::new(LogKind::Log, "[LOG] msg".to_string(), String::new());
        assert_eq!(delivery_line(&without), "[LOG] msg");
    }

    #[test]
    fn test_error_description_matches_line() {
        let entry = LogEntry::new(LogKind::Error, "[ERROR] boom".to_string(), "ctx".to_string());
        assert_eq!(error_description(&entry), "[ERROR] boom ctx");
    }
}
