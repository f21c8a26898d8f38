use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::prelude::Rect;
use term_sessions::connector::ScriptedConnector;
use term_sessions::drivers::{OutputDriver, QueuedInputDriver, TestOutputDriver};
use term_sessions::host::{SessionHost, WindowDefaults};
use term_sessions::layout::{Position, ResizeEdge, Size};
use term_sessions::runner::{run_host, windows_area};
use term_sessions::session::{ConnectionStatus, StatusIndicator};

// 120x41 screen: 120x40 for windows plus the status bar row.
const SCREEN: (u16, u16) = (120, 41);

fn host() -> SessionHost<ScriptedConnector> {
    SessionHost::with_defaults(
        ScriptedConnector::new(),
        windows_area(Rect::new(0, 0, SCREEN.0, SCREEN.1)),
        WindowDefaults {
            initial_size: Size::new(40, 10),
            min_size: Size::new(20, 6),
            resize_edges: vec![ResizeEdge::BottomRight],
            ..WindowDefaults::default()
        },
    )
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn draw(host: &mut SessionHost<ScriptedConnector>, output: &mut TestOutputDriver) {
    let screen = output.area().unwrap();
    output
        .draw(|mut frame| host.render(&mut frame, windows_area(screen)))
        .unwrap();
}

fn cells(output: &TestOutputDriver, y: u16, x: usize, len: usize) -> String {
    output.row_text(y).chars().skip(x).take(len).collect()
}

#[test]
fn header_drag_moves_the_window_and_redraws_it() {
    let mut host = host();
    let mut output = TestOutputDriver::new(SCREEN.0, SCREEN.1).unwrap();
    let id = host.open_terminal("i-1", "i-1");
    assert_eq!(host.geometry(&id).unwrap().position, Position::new(40, 15));

    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 45, 15));
    host.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 50, 18));
    assert_eq!(host.geometry(&id).unwrap().position, Position::new(45, 18));
    host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 55, 20));
    assert!(!host.is_dragging());
    assert_eq!(host.geometry(&id).unwrap().position, Position::new(50, 20));

    host.pump_status();
    draw(&mut host, &mut output);
    assert_eq!(cells(&output, 20, 51, 6), ">_ i-1");
    assert!(output.row_text(20).contains("connecting"));
    assert_eq!(cells(&output, 21, 51, 5), "i-1$ ");
}

#[test]
fn drag_far_off_screen_is_clamped() {
    let mut host = host();
    let id = host.open_terminal("i-1", "i-1");
    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 45, 15));
    host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0));
    assert_eq!(host.geometry(&id).unwrap().position, Position::new(0, 0));
    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 0));
    host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 119, 39));
    assert_eq!(host.geometry(&id).unwrap().position, Position::new(80, 30));
}

#[test]
fn corner_resize_resizes_content_on_next_render() {
    let mut host = host();
    let mut output = TestOutputDriver::new(SCREEN.0, SCREEN.1).unwrap();
    let id = host.open_terminal("i-1", "i-1");
    assert_eq!(host.content(&id).unwrap().size(), Size::new(38, 8));

    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 79, 24));
    host.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 89, 29));
    host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 89, 29));
    assert_eq!(host.geometry(&id).unwrap().size, Size::new(50, 15));

    draw(&mut host, &mut output);
    assert_eq!(host.content(&id).unwrap().size(), Size::new(48, 13));

    // Shrinking past the minimum stops at the minimum.
    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 89, 29));
    host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0));
    assert_eq!(host.geometry(&id).unwrap().size, Size::new(20, 6));
}

#[test]
fn close_button_unmounts_and_removes_the_session() {
    let mut host = host();
    let first = host.open_terminal("i-1", "first");
    let second = host.open_terminal("i-2", "second");
    // Move the top window aside so the lower one's close button is exposed.
    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 45, 15));
    host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 5, 0));

    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 78, 15));
    assert!(!host.snapshot().contains(&first));
    assert!(host.frame(&first).is_none());
    assert_eq!(host.focused(), Some(&second));
    assert_eq!(host.connector().unmounted(), vec![first.to_string()]);

    // Reports from the closed session's transport are ignored.
    host.connector()
        .sender_for_seq(first.seq())
        .unwrap()
        .send(ConnectionStatus::Connected);
    host.pump_status();
    assert_eq!(host.snapshot().ids(), vec![second]);
}

#[test]
fn refused_connect_shows_error_and_placeholder() {
    let mut host = host();
    let mut output = TestOutputDriver::new(SCREEN.0, SCREEN.1).unwrap();
    host.connector_mut().refuse("i-dead");
    let id = host.open_terminal("i-dead", "i-dead");

    assert!(host.content(&id).is_none());
    assert_eq!(
        host.snapshot().get(&id).unwrap().status,
        ConnectionStatus::Disconnected
    );
    host.pump_status();
    let status = host.snapshot().get(&id).unwrap().status.clone();
    assert_eq!(status, ConnectionStatus::error("connection to i-dead refused"));
    assert_eq!(status.indicator(), StatusIndicator::Error);

    draw(&mut host, &mut output);
    assert!(output.row_text(16).contains("terminal unavailable"));
}

#[test]
fn keys_reach_only_the_focused_session() {
    let mut host = host();
    let below = host.open_terminal("i-1", "below");
    let above = host.open_terminal("i-2", "above");
    host.handle_event(&Event::Key(KeyEvent::new(
        KeyCode::Char('l'),
        KeyModifiers::NONE,
    )));
    assert_eq!(host.content(&above).unwrap().lines()[0], "i-2$ l");
    assert_eq!(host.content(&below).unwrap().lines()[0], "i-1$ ");

    host.focus(&below);
    host.handle_event(&Event::Key(KeyEvent::new(
        KeyCode::Char('s'),
        KeyModifiers::NONE,
    )));
    assert_eq!(host.content(&below).unwrap().lines()[0], "i-1$ s");
}

#[test]
fn shrinking_the_screen_reclamps_windows() {
    let mut host = host();
    let id = host.open_terminal("i-1", "i-1");
    host.set_area(Rect::new(0, 0, 60, 20));
    let geometry = host.geometry(&id).unwrap();
    assert_eq!(geometry.position, Position::new(20, 10));
    assert_eq!(geometry.size, Size::new(40, 10));

    host.set_area(Rect::new(0, 0, 30, 8));
    let geometry = host.geometry(&id).unwrap();
    assert_eq!(geometry.position, Position::new(0, 0));
    assert_eq!(geometry.size, Size::new(40, 10));

    // The window is now wider and taller than the screen; drawing clips it.
    let mut output = TestOutputDriver::new(30, 9).unwrap();
    draw(&mut host, &mut output);
    assert_eq!(host.area(), Rect::new(0, 0, 30, 8));
    assert_eq!(host.geometry(&id).unwrap().size, Size::new(40, 10));
    assert_eq!(cells(&output, 0, 0, 7), " >_ i-1");
    assert_eq!(cells(&output, 1, 0, 6), "│i-1$ ");
    assert_eq!(output.row_text(0).chars().count(), 30);
}

#[test]
fn configured_icon_is_drawn_in_the_header() {
    let mut host = SessionHost::with_defaults(
        ScriptedConnector::new(),
        windows_area(Rect::new(0, 0, SCREEN.0, SCREEN.1)),
        WindowDefaults {
            initial_size: Size::new(40, 10),
            icon: "#".to_string(),
            ..WindowDefaults::default()
        },
    );
    let mut output = TestOutputDriver::new(SCREEN.0, SCREEN.1).unwrap();
    let id = host.open_terminal("i-1", "web");
    assert_eq!(host.frame(&id).unwrap().icon(), "#");

    draw(&mut host, &mut output);
    let header = host.frame(&id).unwrap().outer_rect(host.area());
    assert_eq!(cells(&output, header.y, header.x as usize + 1, 5), "# web");
}

#[test]
fn run_host_draws_handles_shortcuts_and_cleans_up() {
    let mut host = host();
    host.open_terminal("i-1", "i-1");
    let mut input = QueuedInputDriver::new([ctrl('n'), ctrl('q')]);
    let mut output = TestOutputDriver::new(SCREEN.0, SCREEN.1).unwrap();

    run_host(&mut host, &mut input, &mut output, Duration::ZERO).unwrap();

    assert_eq!(output.frames(), 1);
    let status_row = output.row_text(SCREEN.1 - 1);
    assert!(status_row.starts_with("1 session, 0 connected"));
    assert!(status_row.trim_end().ends_with("^Q quit"));
    assert!(output.row_text(15).contains("connecting"));

    assert_eq!(input.remaining(), 0);
    assert!(!input.mouse_capture());
    assert!(host.snapshot().is_empty());
    assert_eq!(host.connector().unmounted().len(), 2);
}
