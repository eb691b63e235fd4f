//! Runs one exchange and turns its progress into actions.
//!
//! The transport streams [`StreamChunk`]s into a bounded channel while this
//! future forwards them as [`Action`]s. The terminal action (`ResponseDone`
//! or `ResponseFailed`) is sent only after every chunk has been forwarded,
//! so the reducer never sees a completion before the text it completes.

use std::sync::Arc;
use std::sync::mpsc;

use log::{debug, warn};

use crate::core::action::Action;
use crate::transport::{ChatRequest, ChatTransport, StreamChunk};

const CHUNK_BUFFER: usize = 64;

pub async fn run_exchange(
    transport: Arc<dyn ChatTransport>,
    request: u64,
    payload: ChatRequest,
    tx: mpsc::Sender<Action>,
) {
    let (chunk_tx, mut chunk_rx) = tokio::sync::mpsc::channel::<StreamChunk>(CHUNK_BUFFER);

    let exchange = transport.exchange(&payload, chunk_tx);
    let forward = async {
        let mut forwarded = 0usize;
        while let Some(chunk) = chunk_rx.recv().await {
            let action = match chunk {
                StreamChunk::Started => Action::ResponseStarted { request },
                StreamChunk::Content(text) => Action::ResponseChunk { request, text },
            };
            if tx.send(action).is_err() {
                warn!("Failed to forward chunk for request {}: receiver dropped", request);
                // Dropping the receiver makes the transport stop with ChannelClosed
                chunk_rx.close();
                return forwarded;
            }
            forwarded += 1;
        }
        forwarded
    };

    let (result, forwarded) = tokio::join!(exchange, forward);
    debug!("Request {}: forwarded {} actions", request, forwarded);

    let terminal = match result {
        Ok(()) => Action::ResponseDone { request },
        Err(e) => Action::ResponseFailed {
            request,
            error: e.to_string(),
        },
    };
    if tx.send(terminal).is_err() {
        warn!("Failed to send completion for request {}: receiver dropped", request);
    }
}
