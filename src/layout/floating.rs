//! Pure geometry for floating session windows.
//!
//! Every operation takes the current viewport as an argument and returns a
//! clamped result. Nothing here rejects input: out-of-range positions are
//! pulled back on screen and undersized windows are grown to their minimum.

use ratatui::prelude::Rect;

use super::{Position, Size, Viewport, WindowGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::Left,
        ResizeEdge::Right,
        ResizeEdge::Top,
        ResizeEdge::Bottom,
        ResizeEdge::TopLeft,
        ResizeEdge::TopRight,
        ResizeEdge::BottomLeft,
        ResizeEdge::BottomRight,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeEdge::TopLeft
                | ResizeEdge::TopRight
                | ResizeEdge::BottomLeft
                | ResizeEdge::BottomRight
        )
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

/// Signed pointer movement since a drag started, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragDelta {
    pub x: i32,
    pub y: i32,
}

impl DragDelta {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Delta between two pointer positions.
    pub fn between(start: (u16, u16), now: (u16, u16)) -> Self {
        Self {
            x: now.0 as i32 - start.0 as i32,
            y: now.1 as i32 - start.1 as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub edge: ResizeEdge,
    pub rect: Rect,
}

/// Centered placement for a window of `size`.
///
/// Halves round up, and an axis where the window is larger than the viewport
/// pins to 0 so the window never starts with a negative origin.
pub fn initialize(size: Size, viewport: Viewport) -> Position {
    Position {
        x: center_axis(viewport.width, size.width),
        y: center_axis(viewport.height, size.height),
    }
}

/// Reclamp a window after the viewport changed. Size is left untouched.
pub fn on_viewport_change(viewport: Viewport, geometry: WindowGeometry) -> WindowGeometry {
    WindowGeometry {
        position: clamp_position(
            geometry.position.x as i64,
            geometry.position.y as i64,
            geometry.size,
            viewport,
        ),
        size: geometry.size,
    }
}

/// Apply the total pointer delta of a finished drag and clamp on screen.
///
/// Any `i32` delta is accepted; the sum is taken in `i64` so it cannot wrap.
pub fn on_drag_stop(delta: DragDelta, geometry: WindowGeometry, viewport: Viewport) -> Position {
    let x = geometry.position.x as i64 + delta.x as i64;
    let y = geometry.position.y as i64 + delta.y as i64;
    clamp_position(x, y, geometry.size, viewport)
}

/// Enforce `min_size`, then clamp `new_position` using the grown size.
pub fn on_resize(
    new_size: Size,
    new_position: Position,
    min_size: Size,
    viewport: Viewport,
) -> WindowGeometry {
    let size = new_size.at_least(min_size);
    WindowGeometry {
        position: clamp_position(
            new_position.x as i64,
            new_position.y as i64,
            size,
            viewport,
        ),
        size,
    }
}

/// Turn a pointer drag on a resize handle into the `(size, position)` pair
/// consumed by `on_resize`.
///
/// The edge opposite to the dragged one stays anchored. Growth stops at the
/// viewport border on the dragged side; shrinking stops at `min_size`.
pub fn resize_from_edge(
    start: WindowGeometry,
    edge: ResizeEdge,
    delta: DragDelta,
    min_size: Size,
    viewport: Viewport,
) -> (Size, Position) {
    let (x, width) = resize_axis(
        start.position.x as i64,
        start.size.width as i64,
        delta.x as i64,
        edge.moves_left(),
        edge.moves_right(),
        min_size.width as i64,
        viewport.width as i64,
    );
    let (y, height) = resize_axis(
        start.position.y as i64,
        start.size.height as i64,
        delta.y as i64,
        edge.moves_top(),
        edge.moves_bottom(),
        min_size.height as i64,
        viewport.height as i64,
    );
    (
        Size {
            width: to_cells(width.max(1)),
            height: to_cells(height.max(1)),
        },
        Position {
            x: to_cells(x),
            y: to_cells(y),
        },
    )
}

/// `resize_from_edge` followed by `on_resize`.
pub fn apply_resize_drag(
    start: WindowGeometry,
    edge: ResizeEdge,
    delta: DragDelta,
    min_size: Size,
    viewport: Viewport,
) -> WindowGeometry {
    let (size, position) = resize_from_edge(start, edge, delta, min_size, viewport);
    on_resize(size, position, min_size, viewport)
}

/// Hit rectangles for the enabled resize edges of a window drawn at `rect`.
///
/// Corners are single cells; edges span the side between the corners.
pub fn resize_handles(rect: Rect, edges: &[ResizeEdge]) -> Vec<ResizeHandle> {
    let mut handles = Vec::new();
    if rect.width == 0 || rect.height == 0 {
        return handles;
    }
    let right = rect.x.saturating_add(rect.width.saturating_sub(1));
    let bottom = rect.y.saturating_add(rect.height.saturating_sub(1));
    let cell = |x: u16, y: u16| Rect {
        x,
        y,
        width: 1,
        height: 1,
    };
    for &edge in edges {
        let handle_rect = match edge {
            ResizeEdge::TopLeft => cell(rect.x, rect.y),
            ResizeEdge::TopRight => cell(right, rect.y),
            ResizeEdge::BottomLeft => cell(rect.x, bottom),
            ResizeEdge::BottomRight => cell(right, bottom),
            ResizeEdge::Top | ResizeEdge::Bottom => {
                if rect.width <= 2 {
                    continue;
                }
                Rect {
                    x: rect.x.saturating_add(1),
                    y: if edge == ResizeEdge::Top {
                        rect.y
                    } else {
                        bottom
                    },
                    width: rect.width.saturating_sub(2),
                    height: 1,
                }
            }
            ResizeEdge::Left | ResizeEdge::Right => {
                if rect.height <= 2 {
                    continue;
                }
                Rect {
                    x: if edge == ResizeEdge::Left {
                        rect.x
                    } else {
                        right
                    },
                    y: rect.y.saturating_add(1),
                    width: 1,
                    height: rect.height.saturating_sub(2),
                }
            }
        };
        handles.push(ResizeHandle {
            edge,
            rect: handle_rect,
        });
    }
    // Corners win over the edges they overlap.
    handles.sort_by_key(|handle| !handle.edge.is_corner());
    handles
}

fn center_axis(view: u16, size: u16) -> u16 {
    if size >= view {
        return 0;
    }
    let free = view - size;
    free / 2 + free % 2
}

fn clamp_position(x: i64, y: i64, size: Size, viewport: Viewport) -> Position {
    Position {
        x: clamp_axis(x, viewport.width, size.width),
        y: clamp_axis(y, viewport.height, size.height),
    }
}

fn clamp_axis(value: i64, view: u16, size: u16) -> u16 {
    let max = view.saturating_sub(size) as i64;
    value.clamp(0, max) as u16
}

fn resize_axis(
    start: i64,
    length: i64,
    delta: i64,
    moves_low: bool,
    moves_high: bool,
    min: i64,
    view: i64,
) -> (i64, i64) {
    let high = start + length;
    if moves_low {
        let mut origin = (start + delta).min(high - min);
        if origin < 0 {
            origin = 0;
        }
        return (origin, high - origin);
    }
    if moves_high {
        let cap = (view - start).max(min);
        let next = (length + delta).clamp(min, cap);
        return (start, next);
    }
    (start, length)
}

fn to_cells(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}
