//! # Widget State
//!
//! One chat widget instance. Everything the widget knows lives in this
//! struct, so two widgets never share a conversation or a pending flag.
//!
//! ```text
//! Widget
//! ├── id: Uuid                          // instance id, used in logs
//! ├── transport: Arc<dyn ChatTransport> // where messages go
//! ├── conversation: Conversation        // turns sent as history
//! ├── transcript: Transcript            // what the panel shows
//! ├── reply: String                     // accumulated text of the live reply
//! ├── in_flight: Option<u64>            // id of the pending request
//! ├── renderer: RendererState           // Markdown readiness
//! ├── open: bool                        // panel visible (vs. bubble only)
//! └── disposed: bool                    // torn down, ignores everything
//! ```
//!
//! State changes only happen through `update(widget, action)` in action.rs.

use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::ResolvedConfig;
use crate::core::conversation::Conversation;
use crate::core::transcript::Transcript;
use crate::transport::ChatTransport;

/// Shown instead of a reply when an exchange fails. Never stored as a turn.
pub const FALLBACK_MESSAGE: &str =
    "I'm having trouble connecting right now. Please try again later.";

/// Markdown renderer readiness.
///
/// Starts `Pending`; resolves exactly once to `Ready` or `Degraded`.
/// The widget accepts no input while pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererState {
    Pending,
    Ready,
    /// Plain-text fallback. Carries the reason for the status line.
    Degraded(String),
}

impl RendererState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RendererState::Pending)
    }

    pub fn renders_markdown(&self) -> bool {
        matches!(self, RendererState::Ready)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RendererState::Pending => "loading",
            RendererState::Ready => "markdown",
            RendererState::Degraded(_) => "plain text",
        }
    }
}

pub struct Widget {
    pub id: Uuid,
    pub transport: Arc<dyn ChatTransport>,
    pub conversation: Conversation,
    pub transcript: Transcript,
    pub reply: String,
    pub in_flight: Option<u64>,
    pub renderer: RendererState,
    pub open: bool,
    pub title: String,
    pub status_message: String,
    pub disposed: bool,
    next_request_id: u64,
}

impl Widget {
    pub fn new(transport: Arc<dyn ChatTransport>, config: &ResolvedConfig) -> Self {
        let mut transcript = Transcript::new();
        if let Some(greeting) = &config.greeting {
            transcript.push_notice(greeting);
        }
        let status_message = transport.describe();

        Self {
            id: Uuid::new_v4(),
            transport,
            conversation: Conversation::new(),
            transcript,
            reply: String::new(),
            in_flight: None,
            renderer: RendererState::Pending,
            open: config.start_open,
            title: config.title.clone(),
            status_message,
            disposed: false,
            next_request_id: 1,
        }
    }

    /// The submit control is enabled: renderer settled, nothing pending,
    /// panel open and widget alive.
    pub fn accepts_input(&self) -> bool {
        !self.disposed && self.open && self.renderer.is_resolved() && self.in_flight.is_none()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Claims a fresh request id and marks it in flight.
    pub(crate) fn begin_request(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(id);
        id
    }

    /// True when `request` is the one currently in flight.
    pub(crate) fn is_current(&self, request: u64) -> bool {
        !self.disposed && self.in_flight == Some(request)
    }

    /// Ends the request cycle: clears the pending flag (re-enabling submit)
    /// and the typing indicator.
    pub(crate) fn finish_request(&mut self) {
        self.in_flight = None;
        self.reply.clear();
        self.transcript.hide_typing();
    }

    /// Tears the widget down. Returns true if a request was still in flight.
    pub fn dispose(&mut self) -> bool {
        let had_request = self.in_flight.take().is_some();
        self.disposed = true;
        self.transcript.hide_typing();
        had_request
    }
}
