//! # TitleBar Component
//!
//! Header line of the chat panel.
//!
//! Shows the widget title on the left and a status string on the right: the
//! endpoint and response mode, plus the renderer state. When the panel is too
//! narrow for both, the status is cut down first (measured in display cells,
//! so wide characters in a title never overflow the row).
//!
//! ```text
//! Chat with us              http://localhost:8000 (streaming) · markdown
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::Component;

/// Single-row panel header.
///
/// All fields are props from the parent:
/// - `title`: configured widget title
/// - `status`: endpoint and mode, from `Widget::status_message`
/// - `renderer`: renderer state label ("loading", "markdown", "plain text")
pub struct TitleBar {
    pub title: String,
    pub status: String,
    pub renderer: &'static str,
}

impl TitleBar {
    pub fn new(title: String, status: String, renderer: &'static str) -> Self {
        Self {
            title,
            status,
            renderer,
        }
    }

    fn right_text(&self) -> String {
        format!("{} · {}", self.status, self.renderer)
    }

    /// Title and status laid out in `width` cells. The gap between them is
    /// at least one cell wide; an ellipsis marks truncation.
    fn layout(&self, width: usize) -> (String, String) {
        let title = truncate(&self.title, width);
        let room = width.saturating_sub(title.width() + 1);
        let right = truncate(&self.right_text(), room);
        (title, right)
    }
}

/// Cut `text` to at most `max` display cells, ending with `…` when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;
        let (title, right) = self.layout(width);
        let gap = width.saturating_sub(title.width() + right.width());

        let line = Line::from(vec![
            Span::styled(
                title,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(gap)),
            Span::styled(right, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(line, area);
    }
}
