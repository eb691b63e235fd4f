//! # Actions
//!
//! Everything that can happen to a widget becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! A chunk of the reply arrives? That's `Action::ResponseChunk { .. }`.
//!
//! `update()` takes the widget and an action, mutates the widget, and
//! returns an `Effect` describing the I/O the caller should start. No I/O
//! happens here.
//!
//! ```text
//! Widget + Action  →  update()  →  Widget' + Effect
//! ```
//!
//! Transport actions carry the id of the request that produced them. Once a
//! request has completed or failed its id is no longer current, so a late or
//! duplicate action cannot re-enable the submit control a second time.

use log::{debug, info, warn};

use crate::core::conversation::Turn;
use crate::core::state::{FALLBACK_MESSAGE, RendererState, Widget};
use crate::transport::ChatRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Renderer warm-up finished (`Ready`) or gave up (`Degraded`).
    RendererResolved(RendererState),
    /// Bubble clicked: show or hide the panel.
    TogglePanel,
    /// Submit control fired with the input box contents.
    Submit(String),
    /// First sign of the response (headers, or the full buffered body).
    ResponseStarted { request: u64 },
    /// Decoded reply text.
    ResponseChunk { request: u64, text: String },
    /// Reply complete.
    ResponseDone { request: u64 },
    /// The exchange failed; nothing of the reply is kept.
    ResponseFailed { request: u64, error: String },
    /// Tear the widget down.
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Start the exchange for `request` with this payload.
    SpawnRequest { request: u64, payload: ChatRequest },
    /// Abort whatever is in flight and exit.
    Quit,
}

pub fn update(widget: &mut Widget, action: Action) -> Effect {
    if widget.disposed {
        debug!("Widget {} disposed, dropping {:?}", widget.id, action);
        return Effect::None;
    }

    match action {
        Action::RendererResolved(state) => {
            if widget.renderer.is_resolved() {
                return Effect::None;
            }
            match &state {
                RendererState::Degraded(reason) => {
                    warn!("Markdown renderer unavailable, using plain text: {}", reason)
                }
                _ => info!("Markdown renderer ready"),
            }
            widget.renderer = state;
            Effect::None
        }

        Action::TogglePanel => {
            widget.open = !widget.open;
            debug!(
                "Panel {} (pending request: {})",
                if widget.open { "opened" } else { "closed" },
                widget.is_pending()
            );
            Effect::None
        }

        Action::Submit(text) => {
            let message = text.trim();
            if message.is_empty() || !widget.accepts_input() {
                debug!(
                    "Submit ignored (empty={}, pending={}, renderer={})",
                    message.is_empty(),
                    widget.is_pending(),
                    widget.renderer.label()
                );
                return Effect::None;
            }

            widget.transcript.push_user(message);
            widget.conversation.append(Turn::user(message));
            widget.transcript.show_typing();
            widget.reply.clear();

            let payload = match widget.conversation.to_request() {
                Some(payload) => payload,
                None => return Effect::None,
            };
            let request = widget.begin_request();
            info!(
                "Widget {}: request {} submitted ({} turns of history)",
                widget.id,
                request,
                payload.history.len()
            );
            Effect::SpawnRequest { request, payload }
        }

        Action::ResponseStarted { request } => {
            if widget.is_current(request) {
                widget.transcript.hide_typing();
                widget.transcript.begin_reply();
            }
            Effect::None
        }

        Action::ResponseChunk { request, text } => {
            if widget.is_current(request) {
                widget.transcript.hide_typing();
                widget.reply.push_str(&text);
                // Full re-render from the accumulated text, not the delta.
                widget.transcript.replace_live(&widget.reply);
            }
            Effect::None
        }

        Action::ResponseDone { request } => {
            if !widget.is_current(request) {
                debug!("Ignoring completion of stale request {}", request);
                return Effect::None;
            }
            // A reply with no body still gets an (empty) entry and turn.
            widget.transcript.replace_live(&widget.reply);
            widget.transcript.finish_reply();
            let reply = std::mem::take(&mut widget.reply);
            info!("Request {} complete: {} bytes", request, reply.len());
            widget.conversation.append(Turn::assistant(reply));
            widget.finish_request();
            Effect::None
        }

        Action::ResponseFailed { request, error } => {
            if !widget.is_current(request) {
                debug!("Ignoring failure of stale request {}: {}", request, error);
                return Effect::None;
            }
            warn!("Request {} failed: {}", request, error);
            widget.transcript.discard_reply();
            widget.transcript.push_notice(FALLBACK_MESSAGE);
            widget.finish_request();
            Effect::None
        }

        Action::Quit => {
            if widget.dispose() {
                info!("Widget {} disposed with a request in flight; cancelling it", widget.id);
            }
            Effect::Quit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Role;
    use crate::core::transcript::EntryKind;
    use crate::test_support::ready_widget;

    fn submit(widget: &mut Widget, text: &str) -> u64 {
        match update(widget, Action::Submit(text.to_string())) {
            Effect::SpawnRequest { request, .. } => request,
            other => panic!("expected SpawnRequest, got {:?}", other),
        }
    }

    fn reply(widget: &mut Widget, request: u64, chunks: &[&str]) {
        update(widget, Action::ResponseStarted { request });
        for chunk in chunks {
            update(
                widget,
                Action::ResponseChunk {
                    request,
                    text: chunk.to_string(),
                },
            );
        }
        update(widget, Action::ResponseDone { request });
    }

    #[test]
    fn test_hello_scenario() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "Hello");
        reply(&mut widget, request, &["Hi there"]);

        assert_eq!(
            widget.conversation.turns(),
            &[Turn::user("Hello"), Turn::assistant("Hi there")]
        );
        let entries = widget.transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].kind, entries[0].text.as_str()), (EntryKind::User, "Hello"));
        assert_eq!(
            (entries[1].kind, entries[1].text.as_str()),
            (EntryKind::Assistant, "Hi there")
        );
        assert!(widget.accepts_input());
    }

    #[test]
    fn test_failure_scenario() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "Tell me a joke");
        update(
            &mut widget,
            Action::ResponseFailed {
                request,
                error: "endpoint returned HTTP 500".to_string(),
            },
        );

        assert_eq!(widget.conversation.turns(), &[Turn::user("Tell me a joke")]);
        let entries = widget.transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Tell me a joke");
        assert_eq!(entries[1].kind, EntryKind::Notice);
        assert_eq!(entries[1].text, FALLBACK_MESSAGE);
        assert!(widget.accepts_input());
        assert!(!widget.transcript.is_typing());
    }

    #[test]
    fn test_submit_payload_separates_message_and_history() {
        let mut widget = ready_widget();
        let first = submit(&mut widget, "Hello");
        reply(&mut widget, first, &["Hi there"]);

        let effect = update(&mut widget, Action::Submit("Tell me a joke".to_string()));
        match effect {
            Effect::SpawnRequest { payload, .. } => {
                assert_eq!(payload.message, "Tell me a joke");
                assert_eq!(
                    payload.history,
                    vec![Turn::user("Hello"), Turn::assistant("Hi there")]
                );
            }
            other => panic!("expected SpawnRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_n_exchanges_alternate() {
        let mut widget = ready_widget();
        for n in 0..4 {
            let request = submit(&mut widget, &format!("question {n}"));
            reply(&mut widget, request, &["answer ", &n.to_string()]);
        }
        assert_eq!(widget.conversation.len(), 8);
        for (i, turn) in widget.conversation.turns().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role, expected);
        }
    }

    #[test]
    fn test_failed_exchange_leaves_2n_plus_1() {
        let mut widget = ready_widget();
        let first = submit(&mut widget, "one");
        reply(&mut widget, first, &["uno"]);
        let second = submit(&mut widget, "two");
        update(
            &mut widget,
            Action::ResponseFailed {
                request: second,
                error: "boom".to_string(),
            },
        );
        assert_eq!(widget.conversation.len(), 3);
        assert!(!widget.is_pending());

        // Retry appends a second user turn in a row
        let retry = submit(&mut widget, "two");
        reply(&mut widget, retry, &["dos"]);
        let roles: Vec<Role> = widget.conversation.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::User, Role::Assistant]
        );
    }

    #[test]
    fn test_submit_while_pending_is_noop() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "first");
        let before = widget.conversation.len();

        let effect = update(&mut widget, Action::Submit("second".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(widget.conversation.len(), before);
        assert_eq!(widget.in_flight, Some(request));
        assert_eq!(widget.transcript.entries().len(), 1);
    }

    #[test]
    fn test_submit_blank_is_noop() {
        let mut widget = ready_widget();
        assert_eq!(update(&mut widget, Action::Submit("   \n".to_string())), Effect::None);
        assert!(widget.conversation.is_empty());
    }

    #[test]
    fn test_submit_trims_text() {
        let mut widget = ready_widget();
        submit(&mut widget, "  padded  ");
        assert_eq!(widget.conversation.turns()[0].content, "padded");
    }

    #[test]
    fn test_submit_before_renderer_resolves_is_noop() {
        let mut widget = ready_widget();
        widget.renderer = RendererState::Pending;
        assert_eq!(update(&mut widget, Action::Submit("hi".to_string())), Effect::None);
        assert!(widget.conversation.is_empty());
    }

    #[test]
    fn test_typing_indicator_lifecycle() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "hi");
        assert!(widget.transcript.is_typing());
        update(&mut widget, Action::ResponseStarted { request });
        assert!(!widget.transcript.is_typing());
        // Still pending: submit stays disabled until the reply completes
        assert!(!widget.accepts_input());
        update(&mut widget, Action::ResponseDone { request });
        assert!(widget.accepts_input());
    }

    #[test]
    fn test_stream_round_trip() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "code please");
        let chunks = ["Here:\n\n```", "rust\nfn ma", "in() {}\n", "```\n"];
        update(&mut widget, Action::ResponseStarted { request });
        let mut concatenated = String::new();
        for chunk in chunks {
            concatenated.push_str(chunk);
            update(
                &mut widget,
                Action::ResponseChunk {
                    request,
                    text: chunk.to_string(),
                },
            );
            // After each chunk, the live entry holds the full text so far
            let live = widget.transcript.live_index().unwrap();
            assert_eq!(widget.transcript.entries()[live].text, concatenated);
        }
        update(&mut widget, Action::ResponseDone { request });
        assert_eq!(widget.conversation.last().unwrap().content, concatenated);
        assert_eq!(widget.transcript.entries().last().unwrap().text, concatenated);
    }

    #[test]
    fn test_failure_mid_stream_discards_partial_reply() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "hi");
        update(&mut widget, Action::ResponseStarted { request });
        update(
            &mut widget,
            Action::ResponseChunk {
                request,
                text: "partial".to_string(),
            },
        );
        update(
            &mut widget,
            Action::ResponseFailed {
                request,
                error: "connection reset".to_string(),
            },
        );
        assert_eq!(widget.conversation.len(), 1);
        let texts: Vec<&str> = widget
            .transcript
            .entries()
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, vec!["hi", FALLBACK_MESSAGE]);
    }

    #[test]
    fn test_stale_actions_are_ignored() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "hi");
        reply(&mut widget, request, &["hello"]);

        // Duplicate completion / late failure for a finished request
        update(&mut widget, Action::ResponseDone { request });
        update(
            &mut widget,
            Action::ResponseFailed {
                request,
                error: "late".to_string(),
            },
        );
        update(
            &mut widget,
            Action::ResponseChunk {
                request,
                text: "ghost".to_string(),
            },
        );
        assert_eq!(widget.conversation.len(), 2);
        assert_eq!(widget.transcript.entries().len(), 2);
        assert_eq!(widget.transcript.entries()[1].text, "hello");
    }

    #[test]
    fn test_closing_panel_does_not_cancel_request() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "hi");
        update(&mut widget, Action::TogglePanel);
        assert!(!widget.open);
        reply(&mut widget, request, &["still arrives"]);
        assert_eq!(widget.conversation.len(), 2);
        assert!(!widget.is_pending());
        // Closed panel: input stays unavailable until reopened
        assert!(!widget.accepts_input());
        update(&mut widget, Action::TogglePanel);
        assert!(widget.accepts_input());
    }

    #[test]
    fn test_quit_mid_stream_drops_later_actions() {
        let mut widget = ready_widget();
        let request = submit(&mut widget, "hi");
        update(&mut widget, Action::ResponseStarted { request });
        assert_eq!(update(&mut widget, Action::Quit), Effect::Quit);
        update(
            &mut widget,
            Action::ResponseChunk {
                request,
                text: "late".to_string(),
            },
        );
        update(&mut widget, Action::ResponseDone { request });
        assert_eq!(widget.conversation.len(), 1);
    }

    #[test]
    fn test_renderer_resolves_once() {
        let mut widget = ready_widget();
        widget.renderer = RendererState::Pending;
        update(&mut widget, Action::RendererResolved(RendererState::Ready));
        update(
            &mut widget,
            Action::RendererResolved(RendererState::Degraded("late timeout".to_string())),
        );
        assert_eq!(widget.renderer, RendererState::Ready);
    }

    #[test]
    fn test_user_markup_is_stored_verbatim() {
        let mut widget = ready_widget();
        submit(&mut widget, "<b>x</b>");
        assert_eq!(widget.transcript.entries()[0].kind, EntryKind::User);
        assert_eq!(widget.transcript.entries()[0].text, "<b>x</b>");
    }
}
