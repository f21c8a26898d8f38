use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::components::{Component, ComponentContext};
use crate::ui::{UiFrame, truncate_to_width};

/// One-row bar along the bottom of the screen: session summary on the left,
/// key hints on the right.
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default()
                .bg(crate::theme::status_bar_bg())
                .fg(crate::theme::status_bar_fg()),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let row = Rect { height: 1, ..area };
        frame.fill(row, " ", self.style);
        let width = area.width as usize;
        let max_x = area.x.saturating_add(area.width);

        let left = truncate_to_width(&self.left, width);
        let left_end = frame.set_string_clipped(area.x, area.y, &left, max_x, self.style);

        if self.right.is_empty() {
            return;
        }
        // Right side only shows when it fits after the left text and a gap.
        let room = max_x.saturating_sub(left_end).saturating_sub(1) as usize;
        let right_width = self.right.chars().count();
        if right_width <= room {
            let start_x = max_x.saturating_sub(right_width as u16);
            frame.set_string_clipped(start_x, area.y, &self.right, max_x, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn row_text(buffer: &Buffer, width: u16) -> String {
        (0..width).map(|x| buffer[(x, 0)].symbol()).collect()
    }

    #[test]
    fn renders_left_and_right_text() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 1,
        };
        let mut buffer = Buffer::empty(area);
        let mut bar = StatusBar::new();
        bar.set_left("2 sessions");
        bar.set_right("^Q");
        bar.render(
            &mut UiFrame::from_parts(area, &mut buffer),
            area,
            &ComponentContext::default(),
        );
        assert_eq!(row_text(&buffer, 20), "2 sessions        ^Q");
    }

    #[test]
    fn drops_right_text_when_crowded() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 12,
            height: 1,
        };
        let mut buffer = Buffer::empty(area);
        let mut bar = StatusBar::default();
        bar.set_left("2 sessions");
        bar.set_right("^Q quit");
        bar.render(
            &mut UiFrame::from_parts(area, &mut buffer),
            area,
            &ComponentContext::default(),
        );
        assert_eq!(row_text(&buffer, 12), "2 sessions  ");
    }
}
