//! # InputBox Component
//!
//! The message field at the bottom of the panel.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, Ctrl+J for a newline)
//! - Handle editing (backspace, delete, cursor movement)
//! - Handle submission (Enter), but only while enabled
//!
//! The buffer is internal state. Whether the box is enabled is a prop the
//! parent sets from `Widget::accepts_input()` before every event, so text
//! typed while a reply is pending stays in the box until it can be sent.

mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use layout::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_cell, inner_width, next_char_boundary,
    prev_char_boundary, rows, scroll_for,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `disabled_reason`: `None` when sending is allowed; otherwise the
///   reason shown in the title ("Waiting for reply", "Loading")
pub struct InputBox {
    pub buffer: String,
    pub disabled_reason: Option<&'static str>,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// First visible row when the content exceeds the viewport
    scroll: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled_reason: None,
            cursor: 0,
            scroll: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.disabled_reason.is_none()
    }

    /// Height for the current buffer, clamped to the viewport limit.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let count = rows(&self.buffer, inner_width(area_width)).len();
        let visible = u16::try_from(count)
            .unwrap_or(MAX_VISIBLE_LINES)
            .min(MAX_VISIBLE_LINES);
        visible + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let all_rows = rows(&self.buffer, width);
        let (cursor_row, cursor_col) = cursor_cell(&self.buffer, self.cursor, width);
        self.scroll = scroll_for(cursor_row, self.scroll);

        let visible: Vec<String> = all_rows
            .into_iter()
            .skip(self.scroll)
            .take(MAX_VISIBLE_LINES as usize)
            .collect();

        let (title, style) = match self.disabled_reason {
            None => (
                " Message · Enter to send ".to_string(),
                Style::default().fg(Color::Green),
            ),
            Some(reason) => (
                format!(" {reason} "),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style)
            .title(title);

        frame.render_widget(
            Paragraph::new(visible.join("\n")).block(block).style(style),
            area,
        );

        if self.is_enabled() && width > 0 {
            let row = cursor_row.saturating_sub(self.scroll) as u16;
            let col = (cursor_col as u16).min(area.width.saturating_sub(2));
            frame.set_cursor_position((area.x + 1 + col, area.y + 1 + row));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert(c.encode_utf8(&mut encoded));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals may deliver CRLF in pastes
                self.insert(&text.replace("\r\n", "\n").replace('\r', "\n"));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit if self.is_enabled() && !self.buffer.trim().is_empty() => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "ab");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = typed("hello");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".to_string()))
        );
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = typed("  \n ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "  \n ");
    }

    #[test]
    fn test_disabled_submit_keeps_text() {
        let mut input = typed("hold on");
        input.disabled_reason = Some("Waiting for reply");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "hold on");

        input.disabled_reason = None;
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hold on".to_string()))
        );
    }

    #[test]
    fn test_typing_allowed_while_disabled() {
        let mut input = InputBox::new();
        input.disabled_reason = Some("Waiting for reply");
        input.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(input.buffer, "x");
    }

    #[test]
    fn test_cursor_editing_multibyte() {
        let mut input = typed("héllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "hllo");
        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "hllo!");
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("a\r\nb".to_string()));
        assert_eq!(input.buffer, "a\nb");
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        input.buffer = "1\n2\n3\n4\n5\n6".to_string();
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_disabled_reason() {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        let mut input = InputBox::new();
        input.disabled_reason = Some("Waiting for reply");

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Waiting for reply"));
    }
}
