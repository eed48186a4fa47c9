//! Best-effort extraction of assistant text from an engine reply.
//!
//! The chatflow engine's response contract is unspecified: depending on the
//! flow it may return a bare string, an object with the text under any of
//! several keys, or something else entirely. Extraction probes a fixed
//! ordered key list and reports what it found as a discriminated
//! [`ExtractedReply`] instead of silently coercing, so unmatched shapes can
//! be logged before falling back.

use serde_json::Value;

/// Shown when the reply is neither an object nor a string.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

/// Candidate keys probed in order on object replies. `content` is handled
/// separately: it participates only when its value is itself a string.
const CANDIDATE_KEYS: [&str; 6] = ["text", "response", "answer", "data", "result", "message"];

/// Outcome of probing one engine reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedReply {
    /// The reply was already a plain string.
    Verbatim(String),
    /// A candidate key held a non-empty string.
    Field { key: &'static str, text: String },
    /// No candidate matched; the whole object, JSON-serialized.
    RawJson(String),
    /// Neither object nor string.
    Unintelligible,
}

impl ExtractedReply {
    /// Collapse to the display string.
    pub fn into_text(self) -> String {
        match self {
            ExtractedReply::Verbatim(text) => text,
            ExtractedReply::Field { text, .. } => text,
            ExtractedReply::RawJson(json) => json,
            ExtractedReply::Unintelligible => FALLBACK_REPLY.to_string(),
        }
    }
}

/// Probe a reply for its assistant text.
///
/// Candidate keys match only non-empty string values; a candidate key
/// holding an object or number is skipped rather than stringified.
pub fn extract_reply(value: &Value) -> ExtractedReply {
    match value {
        Value::String(text) => ExtractedReply::Verbatim(text.clone()),
        Value::Object(map) => {
            for key in CANDIDATE_KEYS {
                if let Some(Value::String(text)) = map.get(key)
                    && !text.is_empty()
                {
                    return ExtractedReply::Field {
                        key,
                        text: text.clone(),
                    };
                }
            }
            if let Some(Value::String(text)) = map.get("content")
                && !text.is_empty()
            {
                return ExtractedReply::Field {
                    key: "content",
                    text: text.clone(),
                };
            }
            ExtractedReply::RawJson(value.to_string())
        }
        _ => ExtractedReply::Unintelligible,
    }
}

/// Extract and collapse in one step, logging unmatched shapes.
///
/// Never fails: every reply shape maps to some display string.
pub fn normalize_reply(value: &Value) -> String {
    let reply = extract_reply(value);
    match &reply {
        ExtractedReply::RawJson(_) => {
            let keys: Vec<&str> = value
                .as_object()
                .map(|m| m.keys().map(String::as_str).collect())
                .unwrap_or_default();
            tracing::warn!(?keys, "no recognized text field in chatflow reply");
        }
        ExtractedReply::Unintelligible => {
            tracing::warn!("chatflow reply was neither object nor string");
        }
        _ => {}
    }
    reply.into_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_used_verbatim() {
        assert_eq!(normalize_reply(&json!("hello")), "hello");
    }

    #[test]
    fn test_text_key() {
        assert_eq!(normalize_reply(&json!({"text": "hi"})), "hi");
    }

    #[test]
    fn test_answer_key() {
        assert_eq!(normalize_reply(&json!({"answer": "ok"})), "ok");
    }

    #[test]
    fn test_key_precedence_order() {
        let value = json!({"answer": "second", "text": "first"});
        let reply = extract_reply(&value);
        assert_eq!(
            reply,
            ExtractedReply::Field {
                key: "text",
                text: "first".to_string()
            }
        );
    }

    #[test]
    fn test_empty_string_values_skipped() {
        let value = json!({"text": "", "response": "fallthrough"});
        assert_eq!(normalize_reply(&value), "fallthrough");
    }

    #[test]
    fn test_content_only_when_string() {
        assert_eq!(normalize_reply(&json!({"content": "inline"})), "inline");
        let nested = json!({"content": {"parts": ["a"]}});
        assert!(matches!(extract_reply(&nested), ExtractedReply::RawJson(_)));
    }

    #[test]
    fn test_non_string_candidate_skipped() {
        let value = json!({"data": {"rows": 3}, "message": "from data row"});
        assert_eq!(normalize_reply(&value), "from data row");
    }

    #[test]
    fn test_unrecognized_object_serialized() {
        let value = json!({"foo": "bar"});
        assert_eq!(normalize_reply(&value), r#"{"foo":"bar"}"#);
    }

    #[test]
    fn test_non_object_non_string_falls_back() {
        assert_eq!(normalize_reply(&json!(42)), FALLBACK_REPLY);
        assert_eq!(normalize_reply(&json!(null)), FALLBACK_REPLY);
        assert_eq!(normalize_reply(&json!([1, 2])), FALLBACK_REPLY);
    }
}
