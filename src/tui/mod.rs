//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the bubble and
//! panel, and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (typing indicator, renderer still loading): draws every
//!   ~80ms.
//! - **Idle**: sleeps up to 500ms and only redraws on input, resize, or a
//!   background action (each streamed chunk is one).
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::exchange::run_exchange;
use crate::core::state::{RendererState, Widget};
use crate::transport::{ChatRequest, ChatTransport, HttpTransport};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Warm the Markdown renderer off the UI loop and report how it went.
///
/// Resolves exactly once. Anything other than a timely success degrades to
/// plain text rather than leaving the widget stuck in `Pending`.
pub async fn probe_renderer(enabled: bool, timeout: Duration) -> RendererState {
    if !enabled {
        return RendererState::Degraded("disabled by configuration".to_string());
    }
    let warm_up = tokio::task::spawn_blocking(markdown::warm_up);
    match tokio::time::timeout(timeout, warm_up).await {
        Ok(Ok(Ok(()))) => RendererState::Ready,
        Ok(Ok(Err(reason))) => RendererState::Degraded(reason),
        Ok(Err(e)) => RendererState::Degraded(format!("warm-up task failed: {e}")),
        Err(_) => RendererState::Degraded(format!(
            "not ready after {}ms",
            timeout.as_millis()
        )),
    }
}

fn spawn_renderer_probe(config: &ResolvedConfig, tx: mpsc::Sender<Action>) {
    let enabled = config.markdown;
    let timeout = config.renderer_timeout;
    tokio::spawn(async move {
        let state = probe_renderer(enabled, timeout).await;
        if tx.send(Action::RendererResolved(state)).is_err() {
            warn!("Failed to report renderer state: receiver dropped");
        }
    });
}

fn spawn_request(
    transport: Arc<dyn ChatTransport>,
    request: u64,
    payload: ChatRequest,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!("Spawning request {}", request);
    tokio::spawn(run_exchange(transport, request, payload, tx)).abort_handle()
}

/// Apply an action and start whatever I/O it asks for. Returns true when
/// the widget has been torn down and the loop should exit.
fn dispatch(
    widget: &mut Widget,
    action: Action,
    tx: &mpsc::Sender<Action>,
    active_request: &mut Option<AbortHandle>,
) -> bool {
    match update(widget, action) {
        Effect::None => false,
        Effect::SpawnRequest { request, payload } => {
            let handle = spawn_request(widget.transport.clone(), request, payload, tx.clone());
            *active_request = Some(handle);
            false
        }
        Effect::Quit => {
            if let Some(handle) = active_request.take() {
                handle.abort();
            }
            true
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let transport: Arc<dyn ChatTransport> =
        Arc::new(HttpTransport::new(&config.base_url, config.mode));
    let mut widget = Widget::new(transport, &config);
    let mut tui = TuiState::new();
    info!("Widget {} created ({})", widget.id, widget.status_message);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_renderer_probe(&config, tx.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    let mut active_request: Option<AbortHandle> = None;
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let animating = widget.transcript.is_typing() || !widget.renderer.is_resolved();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.input_box.disabled_reason = ui::input_disabled_reason(&widget);
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 6.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &widget, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::ForceQuit => Some(Action::Quit),
                TuiEvent::TogglePanel => Some(Action::TogglePanel),
                // Esc closes the panel; with the panel already closed it quits
                TuiEvent::Escape if widget.open => Some(Action::TogglePanel),
                TuiEvent::Escape => Some(Action::Quit),
                // Closed panel: nothing else is interactive
                _ if !widget.open => None,
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                    None
                }
                _ => {
                    // State may have changed earlier in this batch
                    tui.input_box.disabled_reason = ui::input_disabled_reason(&widget);
                    match tui.input_box.handle_event(&event) {
                        Some(InputEvent::Submit(text)) => {
                            tui.message_list.stick_to_bottom = true;
                            Some(Action::Submit(text))
                        }
                        Some(InputEvent::ContentChanged) | None => None,
                    }
                }
            };

            if let Some(action) = action
                && dispatch(&mut widget, action, &tx, &mut active_request)
            {
                break 'main;
            }
        }

        // Handle background task actions (renderer probe, streamed replies)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut widget, action, &tx, &mut active_request) {
                break 'main;
            }
        }
    }

    info!("Widget {} closed", widget.id);
    ratatui::restore();
    Ok(())
}
