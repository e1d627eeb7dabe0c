//! Minimal-extraction event classifier.
//!
//! Pulls only the fields the route table needs ([`EventAttributes`]) out of
//! a serialized event or transaction payload, without a full event model.
//! Malformed payloads are never fatal: they classify as empty attributes so
//! the envelope falls through to the default project.

use std::collections::HashMap;

use serde_json::Value;

/// Transient per-event attribute snapshot consumed by route matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventAttributes {
    pub tags: HashMap<String, String>,
    pub exception_type: Option<String>,
    pub message: Option<String>,
    pub environment: Option<String>,
    pub level: Option<String>,
}

impl EventAttributes {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Extract routing attributes from a raw event/transaction payload.
///
/// Parse failures are recovered locally: the result is simply empty.
#[must_use]
pub fn classify(payload: &[u8]) -> EventAttributes {
    let doc: Value = match serde_json::from_slice(payload) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(error = %e, "unparsable item payload, classifying as empty");
            return EventAttributes::empty();
        }
    };

    EventAttributes {
        tags: extract_tags(&doc),
        exception_type: extract_exception_type(&doc),
        message: extract_message(&doc),
        environment: doc
            .get("environment")
            .and_then(Value::as_str)
            .map(String::from),
        level: doc.get("level").and_then(Value::as_str).map(String::from),
    }
}

/// Flat key -> string-value map at the document's `tags` field.
/// Absent or non-object `tags` yields an empty map; scalar tag values are
/// stringified, nested values are skipped.
fn extract_tags(doc: &Value) -> HashMap<String, String> {
    let Some(tags) = doc.get("tags").and_then(Value::as_object) else {
        return HashMap::new();
    };

    tags.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// `type` of the first element of `exception.values`, if present.
fn extract_exception_type(doc: &Value) -> Option<String> {
    doc.get("exception")?
        .get("values")?
        .get(0)?
        .get("type")?
        .as_str()
        .map(String::from)
}

/// `message.formatted` when present, else `message` itself as plain text.
fn extract_message(doc: &Value) -> Option<String> {
    let message = doc.get("message")?;
    if let Some(formatted) = message.get("formatted").and_then(Value::as_str) {
        return Some(formatted.to_string());
    }
    message.as_str().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_fields() {
        let payload = serde_json::json!({
            "tags": {"status": "502", "gateway": "true"},
            "exception": {"values": [{"type": "BadGatewayException", "value": "boom"}]},
            "message": {"formatted": "Upstream service returned 502"},
            "environment": "production",
            "level": "error",
        });

        let attrs = classify(payload.to_string().as_bytes());
        assert_eq!(attrs.tags.get("status").unwrap(), "502");
        assert_eq!(attrs.tags.get("gateway").unwrap(), "true");
        assert_eq!(attrs.exception_type.as_deref(), Some("BadGatewayException"));
        assert_eq!(
            attrs.message.as_deref(),
            Some("Upstream service returned 502")
        );
        assert_eq!(attrs.environment.as_deref(), Some("production"));
        assert_eq!(attrs.level.as_deref(), Some("error"));
    }

    #[test]
    fn plain_string_message() {
        let payload = br#"{"message": "Generic application error occurred"}"#;
        let attrs = classify(payload);
        assert_eq!(
            attrs.message.as_deref(),
            Some("Generic application error occurred")
        );
    }

    #[test]
    fn formatted_takes_precedence_over_plain() {
        let payload = serde_json::json!({
            "message": {"formatted": "formatted text", "message": "raw template"}
        });
        let attrs = classify(payload.to_string().as_bytes());
        assert_eq!(attrs.message.as_deref(), Some("formatted text"));
    }

    #[test]
    fn scalar_tag_values_are_stringified() {
        let payload = serde_json::json!({
            "tags": {"status": 502, "flagged": true, "nested": {"skip": "me"}}
        });
        let attrs = classify(payload.to_string().as_bytes());
        assert_eq!(attrs.tags.get("status").unwrap(), "502");
        assert_eq!(attrs.tags.get("flagged").unwrap(), "true");
        assert!(!attrs.tags.contains_key("nested"));
    }

    #[test]
    fn non_object_tags_yield_empty_map() {
        let attrs = classify(br#"{"tags": ["not", "a", "map"]}"#);
        assert!(attrs.tags.is_empty());
    }

    #[test]
    fn empty_exception_values_yield_none() {
        let attrs = classify(br#"{"exception": {"values": []}}"#);
        assert!(attrs.exception_type.is_none());
    }

    #[test]
    fn malformed_payload_classifies_as_empty() {
        let attrs = classify(b"not json at all {{{");
        assert_eq!(attrs, EventAttributes::empty());
    }
}
