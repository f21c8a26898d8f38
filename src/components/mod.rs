use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod status_bar;

pub use crate::component_context::ComponentContext;
pub use status_bar::StatusBar;

/// Something that draws into a rectangle and may consume input.
///
/// Session content (the terminal) and host chrome (the status bar) both
/// implement this so the host can drive them uniformly.
pub trait Component {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    #[test]
    fn status_bar_keeps_default_resize_and_input_handling() {
        let mut bar = StatusBar::new();
        bar.set_left("2 sessions, 1 connected");
        let ctx = ComponentContext::new(true);
        bar.resize(Rect::new(0, 0, 4, 1), &ctx);
        let key = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!bar.handle_event(&key, &ctx));

        let area = Rect::new(0, 0, 30, 1);
        let mut buffer = Buffer::empty(area);
        bar.render(&mut UiFrame::from_parts(area, &mut buffer), area, &ctx);
        let row: String = (0..area.width).map(|x| buffer[(x, 0)].symbol()).collect();
        assert!(row.starts_with("2 sessions, 1 connected"));
    }
}
