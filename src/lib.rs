//! Bubble library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod transport;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// How the reply body of `POST /api/chat` is consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One JSON document: `{ "reply": "..." }`.
    Buffered,
    /// Raw UTF-8 byte stream, re-rendered after every chunk.
    #[default]
    Streaming,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Buffered => "buffered",
            Mode::Streaming => "streaming",
        }
    }
}
