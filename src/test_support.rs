//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::config::ResolvedConfig;
use crate::core::state::{RendererState, Widget};
use crate::transport::{ChatRequest, ChatTransport, StreamChunk, TransportError};

/// A transport for tests that don't need real API calls.
pub struct NoopTransport;

#[async_trait]
impl ChatTransport for NoopTransport {
    fn describe(&self) -> String {
        "noop".to_string()
    }

    async fn exchange(
        &self,
        _request: &ChatRequest,
        _sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Replays a fixed list of chunks, then succeeds or fails.
pub struct ScriptedTransport {
    chunks: Vec<String>,
    failure: Option<String>,
}

impl ScriptedTransport {
    pub fn replying(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            failure: None,
        }
    }

    pub fn failing_after(chunks: &[&str], error: &str) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            failure: Some(error.to_string()),
        }
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn exchange(
        &self,
        _request: &ChatRequest,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        sender
            .send(StreamChunk::Started)
            .await
            .map_err(|_| TransportError::ChannelClosed)?;
        for chunk in &self.chunks {
            sender
                .send(StreamChunk::Content(chunk.clone()))
                .await
                .map_err(|_| TransportError::ChannelClosed)?;
        }
        match &self.failure {
            Some(error) => Err(TransportError::Network(error.clone())),
            None => Ok(()),
        }
    }
}

pub fn test_config() -> ResolvedConfig {
    ResolvedConfig::default()
}

/// Creates a test Widget with a NoopTransport.
pub fn test_widget() -> Widget {
    Widget::new(Arc::new(NoopTransport), &test_config())
}

/// A widget that accepts input right away: panel open, renderer ready.
pub fn ready_widget() -> Widget {
    let mut widget = test_widget();
    widget.open = true;
    widget.renderer = RendererState::Ready;
    widget
}
