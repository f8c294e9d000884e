//! # Reply Shape Normalization
//!
//! The knowledge service is an LLM-backed retrieval API and does not reply
//! consistently. Observed shapes:
//!
//! | Shape        | Example                                                  |
//! |--------------|----------------------------------------------------------|
//! | `Structured` | `{"height_max": 12, ...}`                                |
//! | `Embedded`   | `"Here you go: {\"height_max\": 12, ...} Hope it helps"` |
//! | `Alternate`  | `{"result": "{\"answer\": ...}"}` or `{"text": "..."}`   |
//! | `Prose`      | `{"text": "The minimum stair width is 1.2 m."}`          |
//!
//! Prose is only recognized under an alternate key. A bare string with no
//! JSON in it is as likely an error page or a refusal as an answer, so it is
//! [`ReplyShape::Unrecognized`].
//!
//! [`ReplyShape::classify`] maps a raw reply onto one of these variants
//! before any domain parsing runs. Callers then pull a JSON object (or prose)
//! out of the shape and deserialize it into their own type.

use serde_json::{Map, Value};

/// Keys under which services nest their real payload.
pub const ALTERNATE_KEYS: &[&str] = &["result", "text", "response", "data"];

/// Alternate keys are followed at most this deep.
const MAX_NESTING: usize = 3;

/// A classified knowledge service reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyShape {
    /// A JSON object that carries the expected key.
    Structured(Map<String, Value>),
    /// A JSON object recovered from inside a string reply.
    Embedded(Map<String, Value>),
    /// The payload sat under an alternate key.
    Alternate {
        key: &'static str,
        inner: Box<ReplyShape>,
    },
    /// Free text with no JSON object in it, found under an alternate key.
    Prose(String),
    /// Nothing usable.
    Unrecognized,
}

impl ReplyShape {
    /// Classify a raw reply, looking for objects that carry `expected_key`.
    pub fn classify(reply: Value, expected_key: &str) -> Self {
        classify_at(reply, expected_key, 0)
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::Embedded(_) => "embedded",
            Self::Alternate { .. } => "alternate",
            Self::Prose(_) => "prose",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// The usable content of this reply, if any.
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            Self::Structured(map) | Self::Embedded(map) => Some(Payload::Object(map)),
            Self::Alternate { inner, .. } => inner.into_payload(),
            Self::Prose(text) => Some(Payload::Prose(text)),
            Self::Unrecognized => None,
        }
    }

    /// The JSON object this reply carries, if any.
    pub fn into_object(self) -> Option<Map<String, Value>> {
        match self.into_payload()? {
            Payload::Object(map) => Some(map),
            Payload::Prose(_) => None,
        }
    }
}

/// What a classified reply carries once wrappers are peeled off.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Object(Map<String, Value>),
    Prose(String),
}

fn classify_at(reply: Value, expected_key: &str, depth: usize) -> ReplyShape {
    match reply {
        Value::Object(map) => classify_object(map, expected_key, depth),
        Value::String(text) => classify_text(&text, expected_key, depth),
        _ => ReplyShape::Unrecognized,
    }
}

fn classify_object(map: Map<String, Value>, expected_key: &str, depth: usize) -> ReplyShape {
    if map.contains_key(expected_key) {
        return ReplyShape::Structured(map);
    }
    if depth >= MAX_NESTING {
        return ReplyShape::Unrecognized;
    }
    for &key in ALTERNATE_KEYS {
        let Some(nested) = map.get(key) else {
            continue;
        };
        if !(nested.is_object() || nested.is_string()) {
            continue;
        }
        let inner = classify_at(nested.clone(), expected_key, depth + 1);
        if inner != ReplyShape::Unrecognized {
            return ReplyShape::Alternate {
                key,
                inner: Box::new(inner),
            };
        }
    }
    ReplyShape::Unrecognized
}

fn classify_text(text: &str, expected_key: &str, depth: usize) -> ReplyShape {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ReplyShape::Unrecognized;
    }
    let Some(span) = extract_json_span(trimmed) else {
        // Bare top-level prose and truncated JSON are both unusable.
        if depth == 0 || trimmed.starts_with('{') {
            return ReplyShape::Unrecognized;
        }
        return ReplyShape::Prose(trimmed.to_string());
    };
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => match classify_object(map, expected_key, depth) {
            ReplyShape::Structured(map) => ReplyShape::Embedded(map),
            other => other,
        },
        _ => ReplyShape::Unrecognized,
    }
}

/// The first-`{`-to-last-`}` span of `text`, if there is one.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_with_expected_key_is_structured() {
        let shape = ReplyShape::classify(json!({"height_max": 12}), "height_max");
        assert_eq!(shape.kind(), "structured");
        assert_eq!(shape.into_object().unwrap()["height_max"], 12);
    }

    #[test]
    fn json_string_is_embedded() {
        let shape = ReplyShape::classify(json!(r#"{"answer": "1.2 m"}"#), "answer");
        assert_eq!(shape.kind(), "embedded");
        assert_eq!(shape.into_object().unwrap()["answer"], "1.2 m");
    }

    #[test]
    fn json_wrapped_in_prose_is_embedded() {
        let reply = json!("Sure! Here is the data:\n{\"far_max\": 1.75, \"note\": {\"x\": 1}}\nThanks.");
        let shape = ReplyShape::classify(reply, "far_max");
        assert_eq!(shape.kind(), "embedded");
        let map = shape.into_object().unwrap();
        assert_eq!(map["far_max"], 1.75);
        assert_eq!(map["note"]["x"], 1);
    }

    #[test]
    fn payload_under_alternate_key_is_found() {
        let reply = json!({"result": "{\"answer\": \"7 m\", \"clause\": \"5.1.1\"}"});
        let shape = ReplyShape::classify(reply, "answer");
        assert!(matches!(&shape, ReplyShape::Alternate { key: "result", .. }));
        assert_eq!(shape.into_object().unwrap()["clause"], "5.1.1");

        let reply = json!({"data": {"height_max": 15}});
        let shape = ReplyShape::classify(reply, "height_max");
        assert!(matches!(&shape, ReplyShape::Alternate { key: "data", .. }));
    }

    #[test]
    fn prose_under_alternate_key_is_prose() {
        let reply = json!({"text": "Stairs must be at least 1.2 m wide."});
        let shape = ReplyShape::classify(reply, "answer");
        assert_eq!(shape.kind(), "alternate");
        assert_eq!(
            shape.into_payload(),
            Some(Payload::Prose("Stairs must be at least 1.2 m wide.".to_string()))
        );
    }

    #[test]
    fn bare_prose_is_unrecognized() {
        let shape = ReplyShape::classify(json!("Service temporarily unavailable"), "answer");
        assert_eq!(shape, ReplyShape::Unrecognized);
        assert_eq!(shape.into_payload(), None);
    }

    #[test]
    fn alternate_keys_are_tried_in_order() {
        let reply = json!({
            "text": "{\"answer\": \"from text\"}",
            "result": "{\"answer\": \"from result\"}"
        });
        let map = ReplyShape::classify(reply, "answer").into_object().unwrap();
        assert_eq!(map["answer"], "from result");
    }

    #[test]
    fn unexpected_shapes_are_unrecognized() {
        assert_eq!(ReplyShape::classify(json!(42), "answer"), ReplyShape::Unrecognized);
        assert_eq!(ReplyShape::classify(json!([1, 2]), "answer"), ReplyShape::Unrecognized);
        assert_eq!(ReplyShape::classify(json!(null), "answer"), ReplyShape::Unrecognized);
        assert_eq!(ReplyShape::classify(json!("   "), "answer"), ReplyShape::Unrecognized);
        assert_eq!(
            ReplyShape::classify(json!({"status": "ok"}), "answer"),
            ReplyShape::Unrecognized
        );
    }

    #[test]
    fn broken_json_in_string_is_unrecognized() {
        let shape = ReplyShape::classify(json!("{\"answer\": \"cut off"), "answer");
        assert_eq!(shape, ReplyShape::Unrecognized);

        let shape = ReplyShape::classify(json!("{\"answer\": } oops }"), "answer");
        assert_eq!(shape, ReplyShape::Unrecognized);
    }

    #[test]
    fn embedded_object_without_expected_key_is_unrecognized() {
        let shape = ReplyShape::classify(json!("{\"status\": \"ok\"}"), "answer");
        assert_eq!(shape, ReplyShape::Unrecognized);
    }

    #[test]
    fn nesting_is_bounded() {
        let mut reply = json!({"answer": "deep"});
        for _ in 0..5 {
            reply = json!({ "data": reply });
        }
        assert_eq!(ReplyShape::classify(reply, "answer"), ReplyShape::Unrecognized);
    }

    #[test]
    fn json_span_extraction() {
        assert_eq!(extract_json_span("a {b} c {d} e"), Some("{b} c {d}"));
        assert_eq!(extract_json_span("no braces"), None);
        assert_eq!(extract_json_span("} backwards {"), None);
    }
}
