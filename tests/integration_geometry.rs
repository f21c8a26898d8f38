use term_sessions::layout::{
    DragDelta, Position, ResizeEdge, Size, Viewport, WindowGeometry, apply_resize_drag,
    initialize, on_drag_stop, on_resize, on_viewport_change,
};

fn geom(x: u16, y: u16, w: u16, h: u16) -> WindowGeometry {
    WindowGeometry::new(Position::new(x, y), Size::new(w, h))
}

#[test]
fn window_opens_centered_on_a_full_hd_viewport() {
    let viewport = Viewport::new(1920, 1080);
    assert_eq!(
        initialize(Size::new(900, 600), viewport),
        Position::new(510, 240)
    );
}

#[test]
fn drag_past_every_border_is_pulled_back() {
    let viewport = Viewport::new(200, 60);
    let start = geom(50, 20, 80, 24);
    let deltas = [
        (-500, 0),
        (500, 0),
        (0, -500),
        (0, 500),
        (-1, -1),
        (1000, 1000),
        (i32::MAX, i32::MIN),
    ];
    for (dx, dy) in deltas {
        let pos = on_drag_stop(DragDelta::new(dx, dy), start, viewport);
        let moved = WindowGeometry::new(pos, start.size);
        assert!(moved.fits(viewport), "delta ({dx}, {dy}) escaped: {pos:?}");
    }
    assert_eq!(
        on_drag_stop(DragDelta::new(1000, 1000), start, viewport),
        Position::new(120, 36)
    );
}

#[test]
fn resize_below_minimum_grows_back_and_stays_on_screen() {
    let viewport = Viewport::new(100, 40);
    let min = Size::new(30, 10);
    let result = on_resize(Size::new(5, 2), Position::new(95, 39), min, viewport);
    assert_eq!(result.size, min);
    assert_eq!(result.position, Position::new(70, 30));
    assert!(result.fits(viewport));
}

#[test]
fn shrinking_viewport_keeps_size_and_reclamps_position() {
    let before = geom(510, 240, 900, 600);
    let after = on_viewport_change(Viewport::new(1000, 700), before);
    assert_eq!(after.size, before.size);
    assert_eq!(after.position, Position::new(100, 100));

    // Larger than the new viewport on both axes: pinned to the origin.
    let tiny = on_viewport_change(Viewport::new(800, 500), before);
    assert_eq!(tiny.position, Position::new(0, 0));
    assert_eq!(tiny.size, Size::new(900, 600));
}

#[test]
fn corner_resize_respects_minimum_and_viewport() {
    let viewport = Viewport::new(120, 40);
    let min = Size::new(20, 6);
    let start = geom(40, 15, 40, 10);

    let grown = apply_resize_drag(
        start,
        ResizeEdge::BottomRight,
        DragDelta::new(500, 500),
        min,
        viewport,
    );
    assert_eq!(grown, geom(40, 15, 80, 25));

    let shrunk = apply_resize_drag(
        start,
        ResizeEdge::BottomRight,
        DragDelta::new(-500, -500),
        min,
        viewport,
    );
    assert_eq!(shrunk, geom(40, 15, 20, 6));

    let top_left = apply_resize_drag(
        start,
        ResizeEdge::TopLeft,
        DragDelta::new(-500, -500),
        min,
        viewport,
    );
    assert_eq!(top_left, geom(0, 0, 80, 25));
}
