pub mod floating;

pub use floating::*;

use ratatui::prelude::Rect;

/// Screen area available for placing windows, in cells.
///
/// The viewport is always supplied by the caller (usually the terminal size
/// minus host chrome) so every geometry operation stays a pure function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn from_rect(area: Rect) -> Self {
        Self {
            width: area.width,
            height: area.height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Grow each axis to at least `min`.
    pub fn at_least(self, min: Size) -> Self {
        Self {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }
}

/// On-screen placement of one window, relative to the viewport origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub position: Position,
    pub size: Size,
}

impl WindowGeometry {
    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    /// Translate into an absolute `Rect` inside `area`.
    ///
    /// The size may exceed the viewport (see `on_viewport_change`), so the
    /// caller is expected to clip when drawing.
    pub fn to_rect(&self, area: Rect) -> Rect {
        Rect {
            x: area.x.saturating_add(self.position.x),
            y: area.y.saturating_add(self.position.y),
            width: self.size.width,
            height: self.size.height,
        }
    }

    /// True when the whole window lies inside `viewport`.
    pub fn fits(&self, viewport: Viewport) -> bool {
        self.position.x as u32 + self.size.width as u32 <= viewport.width as u32
            && self.position.y as u32 + self.size.height as u32 <= viewport.height as u32
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_at_least_raises_each_axis_independently() {
        let s = Size::new(10, 50).at_least(Size::new(20, 20));
        assert_eq!(s, Size::new(20, 50));
    }

    #[test]
    fn geometry_to_rect_offsets_by_area_origin() {
        let g = WindowGeometry::new(Position::new(3, 4), Size::new(10, 5));
        let area = Rect {
            x: 1,
            y: 2,
            width: 80,
            height: 24,
        };
        assert_eq!(
            g.to_rect(area),
            Rect {
                x: 4,
                y: 6,
                width: 10,
                height: 5
            }
        );
    }

    #[test]
    fn fits_detects_overflow() {
        let v = Viewport::new(20, 10);
        assert!(WindowGeometry::new(Position::new(10, 5), Size::new(10, 5)).fits(v));
        assert!(!WindowGeometry::new(Position::new(11, 5), Size::new(10, 5)).fits(v));
    }

    #[test]
    fn rect_contains_edge_cases() {
        let r = Rect {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        };
        assert!(!rect_contains(r, 0, 0));
        let r2 = Rect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        };
        assert!(rect_contains(r2, 1, 1));
        assert!(!rect_contains(r2, 4, 1));
    }
}
