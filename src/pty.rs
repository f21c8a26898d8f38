//! PTY-backed terminal transport used by the binary.
//!
//! Each session runs the configured connect command (by default
//! `ssh {instance}`) in a pseudo terminal. Output is parsed with `vt100` and
//! drawn into the window's content area; keys and, when the remote program
//! asks for it, SGR mouse reports are written back to the PTY.
//!
//! Status reporting: `Connecting` when the child is spawned, `Connected`
//! on the first byte of output, and on exit `Disconnected` (status 0) or
//! `Error` (anything else). Nothing is reported after the window unmounts.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use portable_pty::{ChildKiller, CommandBuilder, MasterPty, PtySize, native_pty_system};
use ratatui::layout::Rect;
use ratatui::style::{Color as TColor, Modifier, Style};
use vt100::{MouseProtocolEncoding, MouseProtocolMode};

use crate::components::{Component, ComponentContext};
use crate::config::CommandTemplate;
use crate::connector::{ConnectError, TerminalConnector, TerminalContent};
use crate::constants::PTY_SCROLLBACK_LEN;
use crate::layout::{Size, rect_contains};
use crate::session::{ConnectionStatus, InstanceRef, StatusSender};
use crate::ui::UiFrame;

const SCROLL_STEP: usize = 10;

pub struct PtyConnector {
    template: CommandTemplate,
    scrollback_len: usize,
}

impl PtyConnector {
    pub fn new(template: CommandTemplate) -> Self {
        Self {
            template,
            scrollback_len: PTY_SCROLLBACK_LEN,
        }
    }

    pub fn with_scrollback(mut self, rows: usize) -> Self {
        self.scrollback_len = rows;
        self
    }

    fn command_for(&self, instance: &InstanceRef) -> Result<CommandBuilder, ConnectError> {
        let argv = self.template.render(instance);
        let Some((program, args)) = argv.split_first() else {
            return Err(ConnectError::InvalidCommand(
                "command template is empty".to_string(),
            ));
        };
        let mut command = CommandBuilder::new(program);
        command.args(args);
        if let Ok(cwd) = std::env::current_dir() {
            command.cwd(cwd);
        }
        Ok(command)
    }
}

impl TerminalConnector for PtyConnector {
    type Terminal = PtyTerminal;

    fn connect(
        &mut self,
        instance: &InstanceRef,
        size: Size,
        status: StatusSender,
    ) -> Result<Self::Terminal, ConnectError> {
        let command = self.command_for(instance)?;
        let spawn_err = |stage: &str, err: &dyn std::fmt::Display| ConnectError::Spawn {
            instance: instance.to_string(),
            message: format!("{stage}: {err}"),
        };
        let pty_size = pty_size(size);

        status.send(ConnectionStatus::Connecting);
        let pair = native_pty_system()
            .openpty(pty_size)
            .map_err(|err| spawn_err("openpty", &err))?;
        let mut child = pair
            .slave
            .spawn_command(command)
            .map_err(|err| spawn_err("spawn", &err))?;
        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|err| spawn_err("clone reader", &err))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|err| spawn_err("take writer", &err))?;
        let killer = child.clone_killer();

        let unmounted = Arc::new(AtomicBool::new(false));
        let shared = Arc::new(Mutex::new(ReaderState::default()));

        let reader_shared = Arc::clone(&shared);
        let reader_status = status.clone();
        let reader_unmounted = Arc::clone(&unmounted);
        thread::spawn(move || read_loop(reader, reader_shared, reader_status, reader_unmounted));

        let waiter_status = status.clone();
        let waiter_unmounted = Arc::clone(&unmounted);
        thread::spawn(move || {
            let outcome = match child.wait() {
                Ok(exit) if exit.success() => ConnectionStatus::Disconnected,
                Ok(exit) => {
                    ConnectionStatus::error(format!("exited with status {}", exit.exit_code()))
                }
                Err(err) => ConnectionStatus::error(err.to_string()),
            };
            if !waiter_unmounted.load(Ordering::Relaxed) {
                tracing::debug!(
                    session = %waiter_status.session(),
                    status = %outcome,
                    "pty child exited"
                );
                waiter_status.send(outcome);
            }
        });

        tracing::debug!(session = %status.session(), "spawned pty session");
        Ok(PtyTerminal {
            master: pair.master,
            writer,
            killer,
            shared,
            parser: vt100::Parser::new(pty_size.rows, pty_size.cols, self.scrollback_len),
            scrollback_len: self.scrollback_len,
            last_area: Rect::default(),
            unmounted,
            label: status.session().to_string(),
        })
    }
}

#[derive(Debug, Default)]
struct ReaderState {
    pending: Vec<u8>,
    cursor_report_requested: bool,
}

pub struct PtyTerminal {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    killer: Box<dyn ChildKiller + Send + Sync>,
    shared: Arc<Mutex<ReaderState>>,
    parser: vt100::Parser,
    scrollback_len: usize,
    last_area: Rect,
    unmounted: Arc<AtomicBool>,
    label: String,
}

impl PtyTerminal {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let result = self
            .writer
            .write_all(bytes)
            .and_then(|()| self.writer.flush());
        if let Err(err) = result {
            tracing::debug!(session = %self.label, error = %err, "pty write failed");
        }
    }

    /// Feed pending output into the parser.
    fn update(&mut self) {
        let (bytes, report_cursor) = {
            let mut state = self.shared.lock().unwrap_or_else(|err| err.into_inner());
            let report = std::mem::take(&mut state.cursor_report_requested);
            (std::mem::take(&mut state.pending), report)
        };
        if !bytes.is_empty() {
            self.parser.process(&bytes);
        }
        if report_cursor {
            let (row, col) = self.parser.screen().cursor_position();
            let response = format!("\x1b[{};{}R", row.saturating_add(1), col.saturating_add(1));
            self.write_bytes(response.as_bytes());
        }
    }

    fn scroll(&mut self, up: bool) {
        let screen = self.parser.screen_mut();
        let current = screen.scrollback();
        let next = if up {
            current.saturating_add(SCROLL_STEP).min(self.scrollback_len)
        } else {
            current.saturating_sub(SCROLL_STEP)
        };
        screen.set_scrollback(next);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if matches!(key.code, KeyCode::PageUp | KeyCode::PageDown)
            && key.modifiers.contains(KeyModifiers::SHIFT)
            && !self.parser.screen().alternate_screen()
        {
            self.scroll(key.code == KeyCode::PageUp);
            return true;
        }
        let bytes = key_to_bytes(key);
        if bytes.is_empty() {
            return false;
        }
        if self.parser.screen().scrollback() > 0 {
            self.parser.screen_mut().set_scrollback(0);
        }
        self.write_bytes(&bytes);
        true
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if !rect_contains(self.last_area, mouse.column, mouse.row) {
            return false;
        }
        let screen = self.parser.screen();
        if screen.mouse_protocol_encoding() != MouseProtocolEncoding::Sgr
            || !mouse_event_allowed(screen.mouse_protocol_mode(), mouse.kind)
        {
            return false;
        }
        let local = MouseEvent {
            column: mouse.column.saturating_sub(self.last_area.x),
            row: mouse.row.saturating_sub(self.last_area.y),
            ..*mouse
        };
        let bytes = mouse_event_to_bytes(local);
        self.write_bytes(&bytes);
        true
    }
}

impl Component for PtyTerminal {
    fn resize(&mut self, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let size = pty_size(Size::new(area.width, area.height));
        if let Err(err) = self.master.resize(size) {
            tracing::debug!(session = %self.label, error = %err, "pty resize failed");
        }
        self.parser.screen_mut().set_size(size.rows, size.cols);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.last_area = area;
        self.update();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let screen = self.parser.screen();
        for row in 0..area.height {
            for col in 0..area.width {
                let (symbol, style) = match screen.cell(row, col) {
                    Some(cell) if !cell.is_wide_continuation() => {
                        let symbol = cell.contents().chars().next().unwrap_or(' ');
                        (symbol, cell_style(cell, screen))
                    }
                    _ => (' ', Style::default()),
                };
                let mut buf = [0u8; 4];
                frame.set_cell(
                    area.x.saturating_add(col),
                    area.y.saturating_add(row),
                    symbol.encode_utf8(&mut buf),
                    style,
                );
            }
        }
        if ctx.focused() && !screen.hide_cursor() && screen.scrollback() == 0 {
            let (row, col) = screen.cursor_position();
            if row < area.height
                && col < area.width
                && let Some(cell) = frame
                    .buffer_mut()
                    .cell_mut((area.x + col, area.y + row))
            {
                cell.set_style(cell.style().add_modifier(Modifier::REVERSED));
            }
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release && ctx.focused() => {
                self.handle_key(*key)
            }
            Event::Paste(text) if ctx.focused() => {
                self.write_bytes(text.as_bytes());
                true
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => false,
        }
    }
}

impl TerminalContent for PtyTerminal {
    /// Closing the window ends the session: the child is killed and its
    /// exit is no longer reported.
    fn on_unmount(&mut self) {
        self.unmounted.store(true, Ordering::Relaxed);
        if let Err(err) = self.killer.kill() {
            tracing::debug!(session = %self.label, error = %err, "pty kill failed");
        }
    }
}

fn pty_size(size: Size) -> PtySize {
    PtySize {
        rows: size.height.max(1),
        cols: size.width.max(1),
        pixel_width: 0,
        pixel_height: 0,
    }
}

fn read_loop(
    mut reader: Box<dyn Read + Send>,
    shared: Arc<Mutex<ReaderState>>,
    status: StatusSender,
    unmounted: Arc<AtomicBool>,
) {
    let mut announced = false;
    let mut tail: Vec<u8> = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        if !announced && !unmounted.load(Ordering::Relaxed) {
            status.send(ConnectionStatus::Connected);
            announced = true;
        }
        // The cursor position request may straddle two reads.
        tail.extend_from_slice(&buf[..n]);
        let requested = tail.windows(4).any(|w| w == b"\x1b[6n");
        let keep = tail.len().saturating_sub(3);
        tail.drain(..keep);
        let Ok(mut state) = shared.lock() else {
            break;
        };
        state.pending.extend_from_slice(&buf[..n]);
        state.cursor_report_requested |= requested;
    }
}

fn cell_style(cell: &vt100::Cell, screen: &vt100::Screen) -> Style {
    let mut style = Style::default();
    let mut fg = resolve_color(cell.fgcolor(), screen.fgcolor());
    if cell.bold() {
        fg = brighten_indexed(fg);
        style = style.add_modifier(Modifier::BOLD);
    }
    if let Some(fg) = fg {
        style = style.fg(fg);
    }
    if let Some(bg) = resolve_color(cell.bgcolor(), screen.bgcolor()) {
        style = style.bg(bg);
    }
    if cell.dim() {
        style = style.add_modifier(Modifier::DIM);
    }
    if cell.italic() {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if cell.underline() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if cell.inverse() {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn resolve_color(color: vt100::Color, screen_default: vt100::Color) -> Option<TColor> {
    let color = match color {
        vt100::Color::Default => screen_default,
        other => other,
    };
    match color {
        vt100::Color::Default => None,
        vt100::Color::Idx(idx) => Some(TColor::Indexed(idx)),
        vt100::Color::Rgb(r, g, b) => Some(TColor::Rgb(r, g, b)),
    }
}

fn brighten_indexed(color: Option<TColor>) -> Option<TColor> {
    match color {
        Some(TColor::Indexed(idx)) if idx < 8 => Some(TColor::Indexed(idx + 8)),
        _ => color,
    }
}

fn key_to_bytes(key: KeyEvent) -> Vec<u8> {
    match key.code {
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && let Some(byte) = ctrl_char(c)
            {
                return vec![byte];
            }
            let mut bytes = Vec::new();
            if key.modifiers.contains(KeyModifiers::ALT) {
                bytes.push(0x1b);
            }
            bytes.extend_from_slice(c.to_string().as_bytes());
            bytes
        }
        KeyCode::Enter => vec![b'\r'],
        KeyCode::Backspace => vec![0x7f],
        KeyCode::Esc => vec![0x1b],
        KeyCode::Tab => vec![b'\t'],
        KeyCode::BackTab => b"\x1b[Z".to_vec(),
        KeyCode::Up => b"\x1b[A".to_vec(),
        KeyCode::Down => b"\x1b[B".to_vec(),
        KeyCode::Right => b"\x1b[C".to_vec(),
        KeyCode::Left => b"\x1b[D".to_vec(),
        KeyCode::Home => b"\x1b[H".to_vec(),
        KeyCode::End => b"\x1b[F".to_vec(),
        KeyCode::Insert => b"\x1b[2~".to_vec(),
        KeyCode::Delete => b"\x1b[3~".to_vec(),
        KeyCode::PageUp => b"\x1b[5~".to_vec(),
        KeyCode::PageDown => b"\x1b[6~".to_vec(),
        _ => Vec::new(),
    }
}

fn ctrl_char(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    if c.is_ascii_lowercase() {
        Some((c as u8) - b'a' + 1)
    } else {
        None
    }
}

fn mouse_event_allowed(mode: MouseProtocolMode, kind: MouseEventKind) -> bool {
    use MouseEventKind::*;
    match mode {
        MouseProtocolMode::None => false,
        MouseProtocolMode::Press => matches!(kind, Down(_)),
        MouseProtocolMode::PressRelease => matches!(kind, Down(_) | Up(_)),
        MouseProtocolMode::ButtonMotion => matches!(kind, Down(_) | Up(_) | Drag(_)),
        MouseProtocolMode::AnyMotion => true,
    }
}

fn button_code(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
    }
}

fn mouse_event_to_bytes(mouse: MouseEvent) -> Vec<u8> {
    let (mut code, release) = match mouse.kind {
        MouseEventKind::Down(button) => (button_code(button), false),
        MouseEventKind::Up(button) => (button_code(button), true),
        MouseEventKind::Drag(button) => (32 + button_code(button), false),
        MouseEventKind::Moved => (35, false),
        MouseEventKind::ScrollUp => (64, false),
        MouseEventKind::ScrollDown => (65, false),
        MouseEventKind::ScrollLeft => (66, false),
        MouseEventKind::ScrollRight => (67, false),
    };
    if mouse.modifiers.contains(KeyModifiers::SHIFT) {
        code |= 4;
    }
    if mouse.modifiers.contains(KeyModifiers::ALT) {
        code |= 8;
    }
    if mouse.modifiers.contains(KeyModifiers::CONTROL) {
        code |= 16;
    }
    let action = if release { 'm' } else { 'M' };
    format!(
        "\x1b[<{};{};{}{}",
        code,
        mouse.column.saturating_add(1),
        mouse.row.saturating_add(1),
        action
    )
    .into_bytes()
}
