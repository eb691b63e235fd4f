//! # Bubble Component
//!
//! The floating launcher pinned to the bottom-right corner. It is the only
//! thing drawn while the panel is closed, and stays visible under the open
//! panel as the toggle's anchor.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

const LABEL_OPEN: &str = "💬 Chat";
const LABEL_CLOSE: &str = "✕ Close";
const HINT: &str = "Ctrl+O";
/// Rows used by the bubble (bordered, one line of content).
pub const BUBBLE_HEIGHT: u16 = 3;

/// Launcher props.
///
/// - `open`: panel currently visible (label switches to "Close")
/// - `pending`: a reply is on its way (a dot badge, visible even when closed)
pub struct Bubble {
    pub open: bool,
    pub pending: bool,
}

impl Bubble {
    pub fn new(open: bool, pending: bool) -> Self {
        Self { open, pending }
    }

    fn label(&self) -> &'static str {
        if self.open { LABEL_CLOSE } else { LABEL_OPEN }
    }

    fn content(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                self.label(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {HINT}"), Style::default().fg(Color::DarkGray)),
        ];
        if self.pending {
            spans.push(Span::styled(" ●", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    }

    /// Total width including borders and one cell of padding per side.
    pub fn width(&self) -> u16 {
        let inner = self
            .content()
            .spans
            .iter()
            .map(|s| s.content.width())
            .sum::<usize>();
        u16::try_from(inner + 4).unwrap_or(u16::MAX)
    }

    /// Where the bubble goes inside `area`: bottom-right, clipped to fit.
    pub fn area_in(&self, area: Rect) -> Rect {
        let width = self.width().min(area.width);
        let height = BUBBLE_HEIGHT.min(area.height);
        Rect::new(
            area.x + area.width - width,
            area.y + area.height - height,
            width,
            height,
        )
    }
}

impl Component for Bubble {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(ratatui::widgets::Padding::horizontal(1));
        frame.render_widget(Paragraph::new(self.content()).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_accounts_for_wide_emoji() {
        let bubble = Bubble::new(false, false);
        // "💬" is two cells wide
        let label = LABEL_OPEN.width() + 1 + HINT.width();
        assert_eq!(bubble.width() as usize, label + 4);
    }

    #[test]
    fn pending_badge_widens_bubble() {
        assert!(Bubble::new(false, true).width() > Bubble::new(false, false).width());
    }

    #[test]
    fn area_is_bottom_right() {
        let bubble = Bubble::new(false, false);
        let area = bubble.area_in(Rect::new(0, 0, 80, 24));
        assert_eq!(area.x + area.width, 80);
        assert_eq!(area.y + area.height, 24);
        assert_eq!(area.height, BUBBLE_HEIGHT);
    }

    #[test]
    fn area_clips_to_tiny_terminal() {
        let area = Bubble::new(true, false).area_in(Rect::new(0, 0, 5, 2));
        assert_eq!(area, Rect::new(0, 0, 5, 2));
    }

    #[test]
    fn label_follows_panel_state() {
        assert_eq!(Bubble::new(false, false).label(), LABEL_OPEN);
        assert_eq!(Bubble::new(true, false).label(), LABEL_CLOSE);
    }
}
