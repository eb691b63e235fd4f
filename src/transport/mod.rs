//! # Transport
//!
//! Everything that touches the network. The widget core only sees the
//! [`ChatTransport`] trait and the [`StreamChunk`]s it produces.

pub mod client;
pub mod decode;
pub mod http;
pub mod types;

pub use client::{ChatTransport, TransportError};
pub use http::HttpTransport;
pub use types::{ChatReply, ChatRequest, StreamChunk};
