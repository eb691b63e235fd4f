use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a `Rect`.
///
/// Props are struct fields set by the parent before rendering. `render`
/// takes `&mut self` so stateful components (the message list, the input
/// box) can update caches and scroll offsets during the draw.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// The higher-level event this component emits, if any.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
