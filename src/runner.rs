use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::prelude::Rect;

use crate::components::{Component, ComponentContext, StatusBar};
use crate::connector::TerminalConnector;
use crate::constants::STATUS_BAR_HEIGHT;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::host::SessionHost;
use crate::session::{ConnectionStatus, RegistrySnapshot};

pub const KEY_HINTS: &str = "^N new  ^W close  ^Q quit";

/// Host-level shortcuts handled before input reaches a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Duplicate,
    Close,
    Quit,
}

pub fn command_for(event: &Event) -> Option<HostCommand> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind == KeyEventKind::Release || !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('n') | KeyCode::Char('N') => Some(HostCommand::Duplicate),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(HostCommand::Close),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(HostCommand::Quit),
        _ => None,
    }
}

/// Screen area left for windows once the status bar is reserved.
pub fn windows_area(screen: Rect) -> Rect {
    Rect {
        height: screen.height.saturating_sub(STATUS_BAR_HEIGHT),
        ..screen
    }
}

pub fn status_bar_area(screen: Rect) -> Rect {
    let height = STATUS_BAR_HEIGHT.min(screen.height);
    Rect {
        y: screen.y.saturating_add(screen.height - height),
        height,
        ..screen
    }
}

pub fn session_summary(snapshot: &RegistrySnapshot) -> String {
    let total = snapshot.len();
    let connected = snapshot
        .sessions()
        .iter()
        .filter(|s| s.status == ConnectionStatus::Connected)
        .count();
    let noun = if total == 1 { "session" } else { "sessions" };
    format!("{total} {noun}, {connected} connected")
}

fn apply_command<C: TerminalConnector>(
    host: &mut SessionHost<C>,
    command: HostCommand,
) -> ControlFlow {
    match command {
        HostCommand::Duplicate => {
            if let Some(id) = host.duplicate_focused() {
                tracing::info!(session = %id, "duplicated focused session");
            }
        }
        HostCommand::Close => {
            host.close_focused();
        }
        HostCommand::Quit => return ControlFlow::Quit,
    }
    ControlFlow::Continue
}

/// Drive `host` until Ctrl+Q.
///
/// Every idle tick pumps connection status into the registry and redraws;
/// every input event is checked for host shortcuts first and otherwise
/// routed through the host. All sessions are closed before returning.
pub fn run_host<C, D, O>(
    host: &mut SessionHost<C>,
    input: &mut D,
    output: &mut O,
    poll_interval: Duration,
) -> io::Result<()>
where
    C: TerminalConnector,
    D: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    input.set_mouse_capture(true)?;
    host.set_area(windows_area(output.area()?));

    let mut status_bar = StatusBar::new();
    status_bar.set_right(KEY_HINTS);
    let mut event_loop = EventLoop::new(input, poll_interval);

    let result = event_loop.run(|_, event| {
        let Some(event) = event else {
            host.pump_status();
            status_bar.set_left(session_summary(&host.snapshot()));
            output.draw(|mut frame| {
                let screen = frame.area();
                host.render(&mut frame, windows_area(screen));
                status_bar.render(
                    &mut frame,
                    status_bar_area(screen),
                    &ComponentContext::default(),
                );
            })?;
            return Ok(ControlFlow::Continue);
        };
        if let Some(command) = command_for(&event) {
            return Ok(apply_command(host, command));
        }
        if let Event::Resize(width, height) = event {
            host.set_area(windows_area(Rect::new(0, 0, width, height)));
            return Ok(ControlFlow::Continue);
        }
        host.handle_event(&event);
        Ok(ControlFlow::Continue)
    });

    host.close_all();
    let _ = event_loop.driver().set_mouse_capture(false);
    output.exit()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn shortcuts_need_control() {
        assert_eq!(command_for(&ctrl('n')), Some(HostCommand::Duplicate));
        assert_eq!(command_for(&ctrl('w')), Some(HostCommand::Close));
        assert_eq!(command_for(&ctrl('q')), Some(HostCommand::Quit));
        let plain = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(command_for(&plain), None);
        assert_eq!(command_for(&ctrl('x')), None);
    }

    #[test]
    fn status_bar_takes_the_last_row() {
        let screen = Rect::new(0, 0, 80, 24);
        assert_eq!(windows_area(screen), Rect::new(0, 0, 80, 23));
        assert_eq!(status_bar_area(screen), Rect::new(0, 23, 80, 1));
        let tiny = Rect::new(0, 0, 10, 0);
        assert_eq!(status_bar_area(tiny).height, 0);
    }

    #[test]
    fn summary_counts_connected_sessions() {
        let mut registry = crate::session::SessionRegistry::new();
        let a = registry.open("i-1");
        registry.open("i-2");
        registry.update_status(&a, ConnectionStatus::Connected);
        assert_eq!(session_summary(&registry.snapshot()), "2 sessions, 1 connected");
        registry.close(&a);
        assert_eq!(session_summary(&registry.snapshot()), "1 session, 0 connected");
    }
}
