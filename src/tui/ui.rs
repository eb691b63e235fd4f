use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear};

use crate::core::state::Widget;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::bubble::BUBBLE_HEIGHT;
use crate::tui::components::{Bubble, MessageList, TitleBar};

const PANEL_MAX_WIDTH: u16 = 72;
const PANEL_MAX_HEIGHT: u16 = 32;

/// Why the input box refuses to send right now, if it does.
pub fn input_disabled_reason(widget: &Widget) -> Option<&'static str> {
    if widget.accepts_input() {
        None
    } else if !widget.renderer.is_resolved() {
        Some("Loading…")
    } else if widget.is_pending() {
        Some("Waiting for reply…")
    } else {
        Some("Unavailable")
    }
}

/// The panel sits in the bottom-right corner, directly above the bubble.
pub fn panel_area(area: Rect) -> Rect {
    let available = area.height.saturating_sub(BUBBLE_HEIGHT);
    let width = area.width.min(PANEL_MAX_WIDTH);
    let height = available.min(PANEL_MAX_HEIGHT);
    Rect::new(
        area.x + area.width - width,
        area.y + available - height,
        width,
        height,
    )
}

pub fn draw_ui(frame: &mut Frame, widget: &Widget, tui: &mut TuiState, spinner_frame: usize) {
    let area = frame.area();

    let mut bubble = Bubble::new(widget.open, widget.is_pending());
    let bubble_area = bubble.area_in(area);
    bubble.render(frame, bubble_area);

    if widget.open {
        draw_panel(frame, panel_area(area), widget, tui, spinner_frame);
    }
}

fn draw_panel(
    frame: &mut Frame,
    area: Rect,
    widget: &Widget,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    use Constraint::{Length, Min};

    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input_height = tui.input_box.calculate_height(inner.width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, list_area, input_area] = layout.areas(inner);

    TitleBar::new(
        widget.title.clone(),
        widget.status_message.clone(),
        widget.renderer.label(),
    )
    .render(frame, title_area);

    MessageList::new(
        &mut tui.message_list,
        &widget.transcript,
        widget.renderer.renders_markdown(),
        spinner_frame,
    )
    .render(frame, list_area);

    tui.input_box.render(frame, input_area);
}
