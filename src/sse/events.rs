//! Decoded SSE event types.
//!
//! An [`SseEvent`] is the unit the framer emits: one per complete frame
//! that carried at least one `data:` line.

use serde::Serialize;
use serde_json::Value;

/// Kind assigned to frames that do not carry an `event:` field.
pub const DEFAULT_EVENT_KIND: &str = "message";

/// A single classified line within a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event kind declaration (e.g., "event: status")
    Event(String),
    /// Data payload line (e.g., "data: {\"seq\": 1}")
    Data(String),
    /// Blank line
    Empty,
    /// Any other line, including `:` comments. Ignored by the framer.
    Ignored(String),
}

/// Payload of a decoded event.
///
/// Decided once per frame: the joined `data:` text is tried as JSON and,
/// if that fails, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// The data text parsed as a JSON value
    Json(Value),
    /// The data text as received
    Text(String),
}

impl Payload {
    /// Decode joined `data:` text into a payload.
    ///
    /// Decoding never fails; invalid JSON falls back to [`Payload::Text`].
    pub fn decode(data: String) -> Self {
        match serde_json::from_str::<Value>(&data) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(data),
        }
    }

    /// Returns the structured value, if the payload decoded as JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Returns the raw text, if the payload did not decode as JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text(text) => Some(text),
        }
    }

    /// Look up a string field of a JSON object payload.
    ///
    /// Returns `None` for raw text, non-object values, missing keys and
    /// non-string fields.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.as_json()
            .and_then(|value| value.get(key))
            .and_then(Value::as_str)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

/// One decoded frame: an event kind plus its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SseEvent {
    /// Free-form kind token from the `event:` field
    pub kind: String,
    /// Decoded content of the frame's `data:` lines
    pub payload: Payload,
}

impl SseEvent {
    /// Create an event from a kind and anything convertible to a payload.
    pub fn new(kind: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// Check whether this event has the given kind.
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json_object() {
        let payload = Payload::decode(r#"{"seq":1}"#.to_string());
        assert_eq!(payload, Payload::Json(json!({"seq": 1})));
    }

    #[test]
    fn test_decode_json_scalars() {
        assert_eq!(Payload::decode("42".to_string()), Payload::Json(json!(42)));
        assert_eq!(Payload::decode("true".to_string()), Payload::Json(json!(true)));
        assert_eq!(
            Payload::decode("\"quoted\"".to_string()),
            Payload::Json(json!("quoted"))
        );
    }

    #[test]
    fn test_decode_falls_back_to_text() {
        assert_eq!(
            Payload::decode("hello world".to_string()),
            Payload::Text("hello world".to_string())
        );
        assert_eq!(Payload::decode(String::new()), Payload::Text(String::new()));
        assert_eq!(
            Payload::decode("{\"a\":1}\n{\"b\":2}".to_string()),
            Payload::Text("{\"a\":1}\n{\"b\":2}".to_string())
        );
    }

    #[test]
    fn test_str_field() {
        let payload = Payload::Json(json!({"message": "Searching", "count": 3}));
        assert_eq!(payload.str_field("message"), Some("Searching"));
        assert_eq!(payload.str_field("count"), None);
        assert_eq!(payload.str_field("missing"), None);
        assert_eq!(Payload::from("message").str_field("message"), None);
    }

    #[test]
    fn test_payload_serializes_untagged() {
        let event = SseEvent::new("status", json!({"seq": 1}));
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"kind":"status","payload":{"seq":1}}"#
        );

        let event = SseEvent::new("answer", "plain");
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"kind":"answer","payload":"plain"}"#
        );
    }

    #[test]
    fn test_is_kind() {
        let event = SseEvent::new("done", json!({}));
        assert!(event.is_kind("done"));
        assert!(!event.is_kind("error"));
    }
}
