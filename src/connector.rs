//! Seam between the session host and terminal transports.
//!
//! A transport receives an instance reference and a `StatusSender` and hands
//! back something that can draw itself into a window's content area. It may
//! report status through the sender any number of times, from any thread,
//! for as long as it likes.

use std::sync::{Arc, Mutex};

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use thiserror::Error;

use crate::components::{Component, ComponentContext};
use crate::layout::Size;
use crate::session::{ConnectionStatus, InstanceRef, StatusSender};
use crate::ui::UiFrame;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("invalid connect command: {0}")]
    InvalidCommand(String),
    #[error("failed to start terminal for {instance}: {message}")]
    Spawn { instance: String, message: String },
    #[error("connection to {0} refused")]
    Refused(String),
}

/// Content mounted in a session window.
pub trait TerminalContent: Component {
    /// Called once when the window is closed, right before the content is
    /// dropped. Whether the transport tears its connection down here is the
    /// transport's decision.
    fn on_unmount(&mut self) {}
}

pub trait TerminalConnector {
    type Terminal: TerminalContent;

    /// Start a terminal for `instance` sized for a content area of `size`.
    fn connect(
        &mut self,
        instance: &InstanceRef,
        size: Size,
        status: StatusSender,
    ) -> Result<Self::Terminal, ConnectError>;
}

/// In-memory transport that never touches the network.
///
/// Every connect immediately reports `Connecting`; the caller drives the
/// rest through the retained senders. Typed characters are echoed into the
/// terminal's line buffer. Used by tests and the headless benchmark.
#[derive(Debug, Default)]
pub struct ScriptedConnector {
    senders: Vec<StatusSender>,
    refuse: Vec<InstanceRef>,
    unmounted: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future connect to `instance` fail.
    pub fn refuse(&mut self, instance: impl Into<InstanceRef>) {
        self.refuse.push(instance.into());
    }

    /// Senders handed out so far, in connect order.
    pub fn senders(&self) -> &[StatusSender] {
        &self.senders
    }

    pub fn sender_for_seq(&self, seq: u64) -> Option<&StatusSender> {
        self.senders.iter().find(|s| s.session().seq() == seq)
    }

    /// Session ids whose terminals received `on_unmount`.
    pub fn unmounted(&self) -> Vec<String> {
        self.unmounted
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }
}

impl TerminalConnector for ScriptedConnector {
    type Terminal = ScriptedTerminal;

    fn connect(
        &mut self,
        instance: &InstanceRef,
        size: Size,
        status: StatusSender,
    ) -> Result<Self::Terminal, ConnectError> {
        if self.refuse.contains(instance) {
            return Err(ConnectError::Refused(instance.to_string()));
        }
        status.send(ConnectionStatus::Connecting);
        let terminal = ScriptedTerminal {
            label: status.session().to_string(),
            lines: vec![format!("{instance}$ ")],
            size,
            unmounted: Arc::clone(&self.unmounted),
        };
        self.senders.push(status);
        Ok(terminal)
    }
}

#[derive(Debug)]
pub struct ScriptedTerminal {
    label: String,
    lines: Vec<String>,
    size: Size,
    unmounted: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTerminal {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

impl Component for ScriptedTerminal {
    fn resize(&mut self, area: Rect, _ctx: &ComponentContext) {
        self.size = Size::new(area.width, area.height);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let max_x = area.x.saturating_add(area.width);
        let skip = self.lines.len().saturating_sub(area.height as usize);
        for (row, line) in self.lines.iter().skip(skip).enumerate() {
            let y = area.y.saturating_add(row as u16);
            frame.set_string_clipped(area.x, y, line, max_x, Style::default());
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind == KeyEventKind::Release || !ctx.focused() {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                if let Some(line) = self.lines.last_mut() {
                    line.push(c);
                }
                true
            }
            KeyCode::Enter => {
                self.lines.push(String::new());
                true
            }
            _ => false,
        }
    }
}

impl TerminalContent for ScriptedTerminal {
    fn on_unmount(&mut self) {
        if let Ok(mut list) = self.unmounted.lock() {
            list.push(self.label.clone());
        }
    }
}
