use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::{ChatRequest, StreamChunk};

/// Errors that end an exchange. Every variant is recovered the same way by
/// the widget (fallback notice, input re-enabled); the split exists for logs.
#[derive(Debug)]
pub enum TransportError {
    /// Connection refused, DNS failure, body read interrupted.
    Network(String),
    /// The endpoint answered with a non-success status.
    Status { status: u16, body: String },
    /// The body was not a `{ "reply": ... }` document, or not valid UTF-8.
    Decode(String),
    /// The receiving side went away (widget disposed) mid-exchange.
    ChannelClosed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Status { status, body } => {
                write!(f, "endpoint returned HTTP {status}: {body}")
            }
            TransportError::Decode(msg) => write!(f, "decode error: {msg}"),
            TransportError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Short label for the status line and logs.
    fn describe(&self) -> String;

    /// Runs one exchange, reporting progress on `sender`.
    ///
    /// Returns `Ok(())` once the reply is complete. On `Err`, any content
    /// already sent is partial and must not be committed.
    async fn exchange(
        &self,
        request: &ChatRequest,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError>;
}
