use serde::{Deserialize, Serialize};

use crate::core::conversation::Turn;

/// Body of `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Content of the latest user turn.
    pub message: String,
    /// Every turn before the latest one, oldest first.
    pub history: Vec<Turn>,
}

/// Buffered-mode response body.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
}

/// What a transport reports while an exchange is in progress.
///
/// A successful exchange always produces `Started` before any `Content`.
/// The end of the exchange is the transport's return value, not a chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// The response has begun arriving (headers in streaming mode, the
    /// parsed document in buffered mode). Hides the typing indicator.
    Started,
    /// Decoded reply text. Buffered mode sends the whole reply as one chunk.
    Content(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            message: "Tell me a joke".to_string(),
            history: vec![Turn::user("Hello"), Turn::assistant("Hi there")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "message": "Tell me a joke",
                "history": [
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Hi there" }
                ]
            })
        );
    }

    #[test]
    fn test_empty_history_serializes_as_array() {
        let request = ChatRequest {
            message: "Hello".to_string(),
            history: vec![],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""history":[]"#));
    }

    #[test]
    fn test_chat_reply_ignores_extra_fields() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"reply":"Hi there","model":"x"}"#).unwrap();
        assert_eq!(reply.reply, "Hi there");
    }

    #[test]
    fn test_chat_reply_missing_field_is_error() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"answer":"nope"}"#).is_err());
    }
}
