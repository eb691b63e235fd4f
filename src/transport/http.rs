//! HTTP transport for the `/api/chat` endpoint.
//!
//! One POST per exchange. No retry, no backoff, no request timeout: a slow
//! endpoint keeps the widget pending until it answers or the connection dies.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::mpsc::Sender;

use super::client::{ChatTransport, TransportError};
use super::decode::Utf8ChunkDecoder;
use super::types::{ChatReply, ChatRequest, StreamChunk};
use crate::Mode;

pub const CHAT_PATH: &str = "/api/chat";

pub struct HttpTransport {
    endpoint: String,
    mode: Mode,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport posting to `{base_url}/api/chat`.
    pub fn new(base_url: &str, mode: Mode) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
            mode,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the request and checks the status line.
    async fn send_request(&self, request: &ChatRequest) -> Result<reqwest::Response, TransportError> {
        info!(
            "POST {} ({} mode): message_len={}, history_len={}",
            self.endpoint,
            self.mode.label(),
            request.message.len(),
            request.history.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("Chat endpoint status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat endpoint error: {} - {}", status, body);
            return Err(TransportError::Status { status, body });
        }

        Ok(response)
    }

    async fn exchange_buffered(
        &self,
        response: reqwest::Response,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let reply: ChatReply =
            serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        info!("Buffered reply received: {} bytes", reply.reply.len());
        send(&sender, StreamChunk::Started).await?;
        send(&sender, StreamChunk::Content(reply.reply)).await
    }

    async fn exchange_streaming(
        &self,
        response: reqwest::Response,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        // Headers are in: the reply has started, before any body bytes.
        send(&sender, StreamChunk::Started).await?;

        let mut decoder = Utf8ChunkDecoder::new();
        let mut chunk_count = 0usize;
        let mut total_len = 0usize;
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| TransportError::Network(e.to_string()))?;
            debug!("Raw chunk received: {} bytes", chunk.len());

            let text = decoder.decode(&chunk)?;
            if text.is_empty() {
                continue;
            }
            chunk_count += 1;
            total_len += text.len();
            send(&sender, StreamChunk::Content(text)).await?;
        }
        decoder.finish()?;

        info!(
            "Stream ended: {} text chunks, {} total bytes",
            chunk_count, total_len
        );
        Ok(())
    }
}

async fn send(sender: &Sender<StreamChunk>, chunk: StreamChunk) -> Result<(), TransportError> {
    if sender.send(chunk).await.is_err() {
        warn!("Chunk send failed: receiver dropped");
        return Err(TransportError::ChannelClosed);
    }
    Ok(())
}

#[async_trait]
impl ChatTransport for HttpTransport {
    fn describe(&self) -> String {
        format!("{} ({})", self.endpoint, self.mode.label())
    }

    async fn exchange(
        &self,
        request: &ChatRequest,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        let response = self.send_request(request).await?;
        match self.mode {
            Mode::Buffered => self.exchange_buffered(response, sender).await,
            Mode::Streaming => self.exchange_streaming(response, sender).await,
        }
    }
}
