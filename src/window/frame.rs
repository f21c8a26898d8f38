//! One floating session window: geometry, chrome layout and hit testing.
//!
//! The frame owns only presentation state. It knows nothing about the
//! session behind it beyond the badge it is asked to draw, and it never
//! closes itself: a click on the close button is reported back as
//! `FrameHit::Close` for the host to act on.

use ratatui::prelude::Rect;

use super::decorator::{CLOSE_BUTTON_WIDTH, FrameChrome, HeaderBadge, WindowDecorator};
use crate::layout::{
    self, DragDelta, Position, ResizeEdge, Size, Viewport, WindowGeometry, rect_contains,
};
use crate::ui::UiFrame;

pub const DEFAULT_ICON: &str = ">_";

/// What lies under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHit {
    Close,
    Header,
    Resize(ResizeEdge),
    Content,
    Border,
    Outside,
}

#[derive(Debug, Clone)]
pub struct WindowFrame {
    title: String,
    icon: String,
    min_size: Size,
    resize_edges: Vec<ResizeEdge>,
    geometry: WindowGeometry,
}

impl WindowFrame {
    /// Create a frame of `initial_size` (grown to `min_size`) centered in
    /// `viewport`.
    pub fn new(
        title: impl Into<String>,
        initial_size: Size,
        min_size: Size,
        viewport: Viewport,
    ) -> Self {
        let size = initial_size.at_least(min_size);
        let position = layout::initialize(size, viewport);
        Self {
            title: title.into(),
            icon: DEFAULT_ICON.to_string(),
            min_size,
            resize_edges: vec![ResizeEdge::BottomRight],
            geometry: WindowGeometry::new(position, size),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_resize_edges(mut self, edges: &[ResizeEdge]) -> Self {
        self.resize_edges = edges.to_vec();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn resize_edges(&self) -> &[ResizeEdge] {
        &self.resize_edges
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn on_viewport_change(&mut self, viewport: Viewport) {
        self.geometry = layout::on_viewport_change(viewport, self.geometry);
    }

    /// Geometry the window would have if a drag from `start` ended now.
    pub fn dragged(start: WindowGeometry, delta: DragDelta, viewport: Viewport) -> WindowGeometry {
        WindowGeometry::new(layout::on_drag_stop(delta, start, viewport), start.size)
    }

    /// Geometry the window would have if a resize from `start` ended now.
    pub fn resized(
        &self,
        start: WindowGeometry,
        edge: ResizeEdge,
        delta: DragDelta,
        viewport: Viewport,
    ) -> WindowGeometry {
        layout::apply_resize_drag(start, edge, delta, self.min_size, viewport)
    }

    pub fn move_to(&mut self, delta: DragDelta, start: WindowGeometry, viewport: Viewport) {
        self.geometry = Self::dragged(start, delta, viewport);
    }

    pub fn resize_to(&mut self, size: Size, position: Position, viewport: Viewport) {
        self.geometry = layout::on_resize(size, position, self.min_size, viewport);
    }

    pub(crate) fn set_geometry(&mut self, geometry: WindowGeometry) {
        self.geometry = geometry;
    }

    pub fn outer_rect(&self, area: Rect) -> Rect {
        self.geometry.to_rect(area)
    }

    /// Rectangle handed to the content slot: below the header, inside the
    /// side and bottom borders.
    pub fn content_rect(&self, area: Rect) -> Rect {
        let outer = self.outer_rect(area);
        Rect {
            x: outer.x.saturating_add(1),
            y: outer.y.saturating_add(1),
            width: outer.width.saturating_sub(2),
            height: outer.height.saturating_sub(2),
        }
    }

    /// The draggable part of the header, which excludes the close button.
    pub fn drag_rect(&self, area: Rect) -> Rect {
        let outer = self.outer_rect(area);
        Rect {
            x: outer.x,
            y: outer.y,
            width: outer.width.saturating_sub(CLOSE_BUTTON_WIDTH),
            height: outer.height.min(1),
        }
    }

    pub fn close_rect(&self, area: Rect) -> Rect {
        let outer = self.outer_rect(area);
        let width = CLOSE_BUTTON_WIDTH.min(outer.width);
        Rect {
            x: outer.x.saturating_add(outer.width).saturating_sub(width),
            y: outer.y,
            width,
            height: outer.height.min(1),
        }
    }

    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> FrameHit {
        let outer = self.outer_rect(area);
        if !rect_contains(outer, column, row) {
            return FrameHit::Outside;
        }
        if rect_contains(self.close_rect(area), column, row) {
            return FrameHit::Close;
        }
        let handles = layout::resize_handles(outer, &self.resize_edges);
        let under = |corner: bool| {
            handles
                .iter()
                .filter(|handle| handle.edge.is_corner() == corner)
                .find(|handle| rect_contains(handle.rect, column, row))
                .map(|handle| FrameHit::Resize(handle.edge))
        };
        if let Some(hit) = under(true) {
            return hit;
        }
        // The header shadows the top edge handle.
        if rect_contains(self.drag_rect(area), column, row) {
            return FrameHit::Header;
        }
        if let Some(hit) = under(false) {
            return hit;
        }
        if rect_contains(self.content_rect(area), column, row) {
            return FrameHit::Content;
        }
        FrameHit::Border
    }

    pub fn render_chrome(
        &self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        decorator: &dyn WindowDecorator,
        badge: Option<&HeaderBadge>,
        focused: bool,
    ) {
        let chrome = FrameChrome {
            title: &self.title,
            icon: &self.icon,
            badge,
            focused,
            resize_edges: &self.resize_edges,
        };
        decorator.render_window(frame, self.outer_rect(area), &chrome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 40,
        }
    }

    fn frame() -> WindowFrame {
        WindowFrame::new(
            "i-1",
            Size::new(40, 20),
            Size::new(20, 6),
            Viewport::from_rect(area()),
        )
    }

    #[test]
    fn new_frame_is_centered() {
        let f = frame();
        assert_eq!(f.geometry().position, Position::new(30, 10));
        assert_eq!(f.geometry().size, Size::new(40, 20));
    }

    #[test]
    fn initial_size_is_raised_to_min() {
        let f = WindowFrame::new(
            "t",
            Size::new(5, 2),
            Size::new(20, 6),
            Viewport::new(100, 40),
        );
        assert_eq!(f.geometry().size, Size::new(20, 6));
    }

    #[test]
    fn hit_test_regions() {
        let f = frame();
        // outer rect spans x 30..70, y 10..30
        assert_eq!(f.hit_test(area(), 31, 10), FrameHit::Header);
        assert_eq!(f.hit_test(area(), 68, 10), FrameHit::Close);
        assert_eq!(f.hit_test(area(), 69, 29), FrameHit::Resize(ResizeEdge::BottomRight));
        assert_eq!(f.hit_test(area(), 50, 20), FrameHit::Content);
        assert_eq!(f.hit_test(area(), 30, 20), FrameHit::Border);
        assert_eq!(f.hit_test(area(), 10, 5), FrameHit::Outside);
    }

    #[test]
    fn content_area_is_not_draggable() {
        let f = frame();
        let content = f.content_rect(area());
        for y in content.y..content.y + content.height {
            assert_ne!(f.hit_test(area(), content.x, y), FrameHit::Header);
        }
    }

    #[test]
    fn extra_edges_are_configurable() {
        let f = frame().with_resize_edges(&[ResizeEdge::Left, ResizeEdge::BottomRight]);
        assert_eq!(f.hit_test(area(), 30, 20), FrameHit::Resize(ResizeEdge::Left));
    }

    #[test]
    fn header_stays_draggable_with_every_edge() {
        let f = frame().with_resize_edges(&ResizeEdge::ALL);
        assert_eq!(f.hit_test(area(), 30, 10), FrameHit::Resize(ResizeEdge::TopLeft));
        assert_eq!(f.hit_test(area(), 45, 10), FrameHit::Header);
        assert_eq!(f.hit_test(area(), 45, 29), FrameHit::Resize(ResizeEdge::Bottom));
        assert_eq!(f.hit_test(area(), 69, 20), FrameHit::Resize(ResizeEdge::Right));
    }

    #[test]
    fn move_and_resize_stay_clamped() {
        let mut f = frame();
        let v = Viewport::from_rect(area());
        let start = f.geometry();
        f.move_to(DragDelta::new(500, -500), start, v);
        assert_eq!(f.geometry().position, Position::new(60, 0));
        f.resize_to(Size::new(1, 1), Position::new(90, 35), v);
        assert_eq!(f.geometry().size, Size::new(20, 6));
        assert_eq!(f.geometry().position, Position::new(80, 34));
    }
}
