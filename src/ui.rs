//! UiFrame: a thin wrapper around `ratatui::Frame` that clips drawing to the
//! visible area.
//!
//! Windows may be larger than the viewport after the terminal shrinks, so
//! their chrome and content can extend past the buffer. Every write goes
//! through `UiFrame`, which drops cells outside the clip area instead of
//! letting the underlying `Buffer` panic.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer. Used by tests
    /// and headless rendering.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    /// Set one cell if it falls inside the clip area.
    pub fn set_cell(&mut self, x: u16, y: u16, symbol: &str, style: Style) {
        if !crate::layout::rect_contains(self.area, x, y) {
            return;
        }
        if let Some(cell) = self.buffer.cell_mut((x, y)) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }

    /// Fill `rect` (clipped) with `symbol` in `style`.
    pub fn fill(&mut self, rect: Rect, symbol: &str, style: Style) {
        let Some(clipped) = self.clip_rect(rect) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(symbol);
                    cell.set_style(style);
                }
            }
        }
    }

    /// Write `text` starting at `(x, y)`, never past `max_x` or the clip area.
    /// Returns the column after the last written character.
    pub fn set_string_clipped(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        max_x: u16,
        style: Style,
    ) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= max_x {
                break;
            }
            let mut buf = [0u8; 4];
            self.set_cell(col, y, ch.encode_utf8(&mut buf), style);
            col = col.saturating_add(1);
        }
        col
    }
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}
