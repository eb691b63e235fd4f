use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Entry, EntryKind};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

const USER_COLOR: Color = Color::Green;
const ASSISTANT_COLOR: Color = Color::Blue;
const NOTICE_COLOR: Color = Color::Yellow;

/// A stateless component that renders one transcript entry.
///
/// `Message` is a **transient component**: the parent `MessageList` builds the
/// body once (see [`Message::body`]), caches it, and creates a `Message` each
/// frame to draw it.
///
/// - **User** text is always literal. Markup characters are shown as typed.
/// - **Assistant** text goes through the Markdown renderer when it is ready,
///   and is shown literally when it is not.
/// - **Notice** (greeting, connection failures) is italic and never a turn.
pub struct Message<'a> {
    pub kind: EntryKind,
    pub body: &'a Text<'static>,
}

impl<'a> Message<'a> {
    pub fn new(kind: EntryKind, body: &'a Text<'static>) -> Self {
        Self { kind, body }
    }

    /// Styled content for an entry. This is the expensive step for
    /// assistant replies, so callers cache the result.
    pub fn body(entry: &Entry, markdown_ready: bool) -> Text<'static> {
        match entry.kind {
            EntryKind::User => markdown::plain(entry.text.trim_end(), USER_COLOR),
            EntryKind::Assistant if markdown_ready => markdown::render(&entry.text, ASSISTANT_COLOR),
            EntryKind::Assistant => markdown::plain(entry.text.trim_end(), ASSISTANT_COLOR),
            EntryKind::Notice => {
                let style = Style::default().fg(NOTICE_COLOR).add_modifier(Modifier::ITALIC);
                let lines: Vec<Line<'static>> = entry
                    .text
                    .trim_end()
                    .split('\n')
                    .map(|l| Line::from(Span::styled(l.to_owned(), style)))
                    .collect();
                Text::from(lines)
            }
        }
    }

    /// Rows needed to draw `body` at `width`, borders included.
    pub fn calculate_height(body: &Text<'static>, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding
            return 1;
        }
        let lines = Paragraph::new(body.clone())
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        let lines = u16::try_from(lines).unwrap_or(u16::MAX);
        lines.max(1).saturating_add(VERTICAL_OVERHEAD)
    }

    fn title(&self) -> &'static str {
        match self.kind {
            EntryKind::User => "you",
            EntryKind::Assistant | EntryKind::Notice => "assistant",
        }
    }

    fn border_style(&self) -> Style {
        match self.kind {
            EntryKind::User => Style::default().fg(USER_COLOR).add_modifier(Modifier::DIM),
            EntryKind::Assistant => Style::default().fg(ASSISTANT_COLOR).add_modifier(Modifier::DIM),
            EntryKind::Notice => Style::default().fg(NOTICE_COLOR).add_modifier(Modifier::DIM),
        }
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = self.border_style();
        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.body.clone())
            .wrap(Wrap { trim: false })
            .render(inner_area, buf);
    }
}

impl Component for Message<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Message::new(self.kind, self.body), area);
    }
}

/// Animated "assistant is typing" row shown while a request waits for its
/// first byte.
pub struct TypingIndicator {
    pub frame: usize,
}

impl TypingIndicator {
    pub const HEIGHT: u16 = 3;
    const DOTS: usize = 3;

    fn dots(&self) -> Line<'static> {
        let lit = self.frame % Self::DOTS;
        let spans: Vec<Span<'static>> = (0..Self::DOTS)
            .map(|i| {
                let style = if i == lit {
                    Style::default().fg(ASSISTANT_COLOR).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Span::styled("● ", style)
            })
            .collect();
        Line::from(spans)
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = Style::default().fg(ASSISTANT_COLOR).add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .title("assistant")
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner_area = block.inner(area);
        block.render(area, buf);
        Paragraph::new(self.dots()).render(inner_area, buf);
    }
}
