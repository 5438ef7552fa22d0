//! Core data models used by the library.

use serde::Serialize;
use serde_json::{Map, Value};

/// One passage returned by the vector index.
///
/// Read-only once retrieved; owned by the request that fetched it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Passage {
    /// Passage content (the payload text field).
    pub text: String,
    /// Every other payload field, untouched.
    pub metadata: Map<String, Value>,
    /// Similarity reported by the index.
    pub score: f32,
    /// 0-based position in the index's ordering.
    pub rank: usize,
}

impl Passage {
    /// Convenience constructor for passages without metadata.
    pub fn new(text: impl Into<String>, score: f32, rank: usize) -> Self {
        Self {
            text: text.into(),
            metadata: Map::new(),
            score,
            rank,
        }
    }

    /// Splits a payload into `(text, metadata)`.
    ///
    /// A missing or non-string text field yields an empty text.
    pub fn from_payload(mut payload: Map<String, Value>, text_key: &str, score: f32, rank: usize) -> Self {
        let text = match payload.remove(text_key) {
            Some(Value::String(s)) => s,
            Some(other) => {
                payload.insert(text_key.to_string(), other);
                String::new()
            }
            None => String::new(),
        };
        Self {
            text,
            metadata: payload,
            score,
            rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn text_key_is_moved_out_of_metadata() {
        let p = Passage::from_payload(
            payload(json!({"text": "Funding: EUR 2M", "page": 12, "source": "call.pdf"})),
            "text",
            0.91,
            0,
        );
        assert_eq!(p.text, "Funding: EUR 2M");
        assert_eq!(p.metadata.len(), 2);
        assert_eq!(p.metadata["page"], 12);
        assert!(!p.metadata.contains_key("text"));
    }

    #[test]
    fn non_string_text_is_kept_as_metadata() {
        let p = Passage::from_payload(payload(json!({"text": 5})), "text", 0.1, 3);
        assert_eq!(p.text, "");
        assert_eq!(p.metadata["text"], 5);
        assert_eq!(p.rank, 3);
    }
}
