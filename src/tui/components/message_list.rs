//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Display transcript entries and the typing indicator
//! - Keep the newest content in view unless the user scrolled away
//! - Cache rendered bodies and heights so a streamed reply only re-renders
//!   the entry that changed
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{Entry, EntryKind, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, TypingIndicator};
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Content exists below the viewport and auto-scroll is off.
    pub fn has_content_below(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                let bottom = self.max_offset();
                self.scroll_state.set_offset(Position { x: 0, y: bottom });
            }
            _ => {}
        }
        None
    }
}

struct CachedEntry {
    kind: EntryKind,
    source: String,
    markdown: bool,
    body: Text<'static>,
    height: u16,
}

impl CachedEntry {
    fn matches(&self, entry: &Entry, markdown: bool) -> bool {
        self.kind == entry.kind && self.markdown == markdown && self.source == entry.text
    }
}

/// Rendered bodies and heights, one per transcript entry.
///
/// An entry is rebuilt when its text, kind, or the renderer mode changes.
/// A width change only recomputes heights.
pub struct LayoutCache {
    entries: Vec<CachedEntry>,
    content_width: u16,
    typing_height: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            content_width: 0,
            typing_height: 0,
        }
    }

    /// Bring the cache in line with `transcript`. Returns how many entries
    /// were re-rendered.
    pub fn sync(&mut self, transcript: &Transcript, markdown: bool, content_width: u16) -> usize {
        let entries = transcript.entries();
        self.entries.truncate(entries.len());

        let width_changed = self.content_width != content_width;
        self.content_width = content_width;
        if width_changed {
            for cached in &mut self.entries {
                cached.height = Message::calculate_height(&cached.body, content_width);
            }
        }

        let mut rebuilt = 0;
        for (i, entry) in entries.iter().enumerate() {
            if self.entries.get(i).is_some_and(|c| c.matches(entry, markdown)) {
                continue;
            }
            let body = Message::body(entry, markdown);
            let cached = CachedEntry {
                kind: entry.kind,
                source: entry.text.clone(),
                markdown,
                height: Message::calculate_height(&body, content_width),
                body,
            };
            if i < self.entries.len() {
                self.entries[i] = cached;
            } else {
                self.entries.push(cached);
            }
            rebuilt += 1;
        }

        self.typing_height = if transcript.is_typing() {
            TypingIndicator::HEIGHT
        } else {
            0
        };
        rebuilt
    }

    pub fn total_height(&self) -> u16 {
        self.entries
            .iter()
            .fold(self.typing_height, |acc, e| acc.saturating_add(e.height))
    }
}

/// Scrollable transcript view.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub markdown: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        markdown: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            markdown,
            spinner_frame,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update layout cache
        let rebuilt = self
            .state
            .layout
            .sync(self.transcript, self.markdown, content_width);
        if rebuilt > 0 {
            log::trace!("Re-rendered {} transcript entries", rebuilt);
        }
        let total_height = self.state.layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            let bottom = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }
        let scroll_offset = self.state.scroll_state.offset().y;
        let viewport_end = scroll_offset.saturating_add(area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for cached in &self.state.layout.entries {
            let bottom = y_offset.saturating_add(cached.height);
            if bottom > scroll_offset && y_offset < viewport_end {
                let rect = Rect::new(0, y_offset, content_width, cached.height);
                scroll_view.render_widget(Message::new(cached.kind, &cached.body), rect);
            }
            y_offset = bottom;
        }

        if self.transcript.is_typing() {
            let rect = Rect::new(0, y_offset, content_width, TypingIndicator::HEIGHT);
            scroll_view.render_widget(
                TypingIndicator {
                    frame: self.spinner_frame,
                },
                rect,
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // 4. Hint that newer content is hidden below
        if self.state.has_content_below() && area.height > 0 {
            let hint = Line::styled(
                " ↓ End ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
            let width = hint.width() as u16;
            if width < area.width {
                let hint_area = Rect::new(
                    area.x + area.width - width - 1,
                    area.y + area.height - 1,
                    width,
                    1,
                );
                frame.render_widget(hint, hint_area);
            }
        }
    }
}
