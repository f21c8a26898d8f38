//! Composition root for session windows.
//!
//! `SessionHost` owns the registry, the status tracker, the terminal
//! connector and one mounted `WindowFrame` per live session. Everything runs
//! on the UI thread; transports only ever hold a `StatusSender`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;
use ratatui::style::Style;

use crate::components::{Component, ComponentContext};
use crate::connector::{TerminalConnector, TerminalContent};
use crate::constants::{DEFAULT_MIN_WINDOW_SIZE, DEFAULT_WINDOW_SIZE};
use crate::layout::{DragDelta, ResizeEdge, Size, Viewport, WindowGeometry};
use crate::session::{
    ConnectionStatus, InstanceRef, RegistrySnapshot, SessionId, SessionRegistry, StatusIndicator,
    StatusTracker,
};
use crate::ui::UiFrame;
use crate::window::frame::DEFAULT_ICON;
use crate::window::{DefaultDecorator, FrameHit, HeaderBadge, WindowDecorator, WindowFrame};

const EMPTY_SLOT_TEXT: &str = "terminal unavailable";

/// Settings applied to every window the host mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDefaults {
    pub initial_size: Size,
    pub min_size: Size,
    pub resize_edges: Vec<ResizeEdge>,
    pub icon: String,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_WINDOW_SIZE,
            min_size: DEFAULT_MIN_WINDOW_SIZE,
            resize_edges: vec![ResizeEdge::BottomRight],
            icon: DEFAULT_ICON.to_string(),
        }
    }
}

struct MountedWindow<T> {
    frame: WindowFrame,
    content: Option<T>,
    content_area: Rect,
}

#[derive(Debug, Clone)]
enum PointerGrab {
    Move {
        id: SessionId,
        anchor: (u16, u16),
        start: WindowGeometry,
    },
    Resize {
        id: SessionId,
        edge: ResizeEdge,
        anchor: (u16, u16),
        start: WindowGeometry,
    },
}

impl PointerGrab {
    fn id(&self) -> &SessionId {
        match self {
            PointerGrab::Move { id, .. } | PointerGrab::Resize { id, .. } => id,
        }
    }
}

pub struct SessionHost<C: TerminalConnector> {
    registry: SessionRegistry,
    tracker: StatusTracker,
    connector: C,
    windows: BTreeMap<SessionId, MountedWindow<C::Terminal>>,
    area: Rect,
    defaults: WindowDefaults,
    decorator: Arc<dyn WindowDecorator>,
    focus: Option<SessionId>,
    grab: Option<PointerGrab>,
}

impl<C: TerminalConnector> SessionHost<C> {
    pub fn new(connector: C, area: Rect) -> Self {
        Self::with_defaults(connector, area, WindowDefaults::default())
    }

    pub fn with_defaults(connector: C, area: Rect, defaults: WindowDefaults) -> Self {
        Self {
            registry: SessionRegistry::new(),
            tracker: StatusTracker::new(),
            connector,
            windows: BTreeMap::new(),
            area,
            defaults,
            decorator: Arc::new(DefaultDecorator),
            focus: None,
            grab: None,
        }
    }

    pub fn set_decorator(&mut self, decorator: Arc<dyn WindowDecorator>) {
        self.decorator = decorator;
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.registry.snapshot()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_rect(self.area)
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn focused(&self) -> Option<&SessionId> {
        self.focus.as_ref()
    }

    pub fn frame(&self, id: &SessionId) -> Option<&WindowFrame> {
        self.windows.get(id).map(|w| &w.frame)
    }

    pub fn geometry(&self, id: &SessionId) -> Option<WindowGeometry> {
        self.frame(id).map(WindowFrame::geometry)
    }

    pub fn content(&self, id: &SessionId) -> Option<&C::Terminal> {
        self.windows.get(id).and_then(|w| w.content.as_ref())
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Open a new session window for `instance` and focus it.
    ///
    /// The window is centered in the current viewport. If the connector
    /// cannot produce a terminal, the session stays open with an empty
    /// content slot and its status becomes `Error` on the next pump.
    pub fn open_terminal(
        &mut self,
        instance: impl Into<InstanceRef>,
        title: impl Into<String>,
    ) -> SessionId {
        let instance = instance.into();
        let id = self.registry.open(instance.clone());
        let frame = WindowFrame::new(
            title,
            self.defaults.initial_size,
            self.defaults.min_size,
            self.viewport(),
        )
        .with_icon(self.defaults.icon.clone())
        .with_resize_edges(&self.defaults.resize_edges);
        let content_area = frame.content_rect(self.area);

        let sender = self.tracker.sender_for(id.clone());
        let fallback = sender.clone();
        let content = match self.connector.connect(
            &instance,
            Size::new(content_area.width, content_area.height),
            sender,
        ) {
            Ok(terminal) => Some(terminal),
            Err(err) => {
                tracing::warn!(session = %id, error = %err, "terminal connect failed");
                fallback.send(ConnectionStatus::error(err.to_string()));
                None
            }
        };

        tracing::debug!(session = %id, geometry = ?frame.geometry(), "mounted session window");
        self.windows.insert(
            id.clone(),
            MountedWindow {
                frame,
                content,
                content_area,
            },
        );
        self.focus = Some(id.clone());
        id
    }

    /// Close a session and unmount its window. Unknown ids are ignored.
    ///
    /// Returns whether a window was unmounted.
    pub fn close(&mut self, id: &SessionId) -> bool {
        self.registry.close(id);
        let Some(mut window) = self.windows.remove(id) else {
            return false;
        };
        if let Some(content) = window.content.as_mut() {
            content.on_unmount();
        }
        if self.grab.as_ref().is_some_and(|g| g.id() == id) {
            self.grab = None;
        }
        if self.focus.as_ref() == Some(id) {
            self.focus = self.topmost();
        }
        tracing::debug!(session = %id, "unmounted session window");
        true
    }

    /// Close every session, topmost first.
    pub fn close_all(&mut self) {
        while let Some(id) = self.topmost() {
            self.close(&id);
        }
    }

    pub fn close_focused(&mut self) -> bool {
        match self.focus.clone() {
            Some(id) => self.close(&id),
            None => false,
        }
    }

    /// Open another session on the focused window's instance.
    pub fn duplicate_focused(&mut self) -> Option<SessionId> {
        let id = self.focus.clone()?;
        let title = self.windows.get(&id)?.frame.title().to_string();
        Some(self.open_terminal(id.instance().clone(), title))
    }

    pub fn focus(&mut self, id: &SessionId) -> bool {
        if self.windows.contains_key(id) {
            self.focus = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Apply every queued status message. Returns how many were consumed.
    pub fn pump_status(&mut self) -> usize {
        self.tracker.apply_pending(&mut self.registry)
    }

    /// Move the host into a new screen area and reclamp every window.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.on_viewport_change(Viewport::from_rect(area));
    }

    pub fn on_viewport_change(&mut self, viewport: Viewport) {
        self.area.width = viewport.width;
        self.area.height = viewport.height;
        for window in self.windows.values_mut() {
            window.frame.on_viewport_change(viewport);
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            windows = self.windows.len(),
            "viewport changed"
        );
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(event, mouse),
            Event::Resize(..) => false,
            _ => self.forward_to_focused(event),
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area != self.area {
            self.set_area(area);
        }
        let snapshot = self.registry.snapshot();
        for session in snapshot.sessions() {
            let Some(window) = self.windows.get_mut(&session.id) else {
                continue;
            };
            let focused = self.focus.as_ref() == Some(&session.id);
            let indicator = session.status.indicator();
            let badge = HeaderBadge::new(indicator, session.status.to_string());
            window
                .frame
                .render_chrome(frame, area, self.decorator.as_ref(), Some(&badge), focused);

            let content_area = window.frame.content_rect(area);
            frame.fill(content_area, " ", Style::default());
            let ctx = ComponentContext::new(focused).with_indicator(indicator);
            match window.content.as_mut() {
                Some(content) => {
                    if content_area != window.content_area {
                        content.resize(content_area, &ctx);
                        window.content_area = content_area;
                    }
                    content.render(frame, content_area, &ctx);
                }
                None => {
                    frame.set_string_clipped(
                        content_area.x.saturating_add(1),
                        content_area.y,
                        EMPTY_SLOT_TEXT,
                        content_area.x.saturating_add(content_area.width),
                        Style::default().fg(crate::theme::placeholder_fg()),
                    );
                }
            }
        }
    }

    fn topmost(&self) -> Option<SessionId> {
        self.registry
            .list()
            .iter()
            .rev()
            .find(|s| self.windows.contains_key(&s.id))
            .map(|s| s.id.clone())
    }

    /// Topmost window under the pointer along with what was hit.
    fn hit_test(&self, column: u16, row: u16) -> Option<(SessionId, FrameHit)> {
        self.registry.list().iter().rev().find_map(|session| {
            let window = self.windows.get(&session.id)?;
            match window.frame.hit_test(self.area, column, row) {
                FrameHit::Outside => None,
                hit => Some((session.id.clone(), hit)),
            }
        })
    }

    fn handle_mouse(&mut self, event: &Event, mouse: &MouseEvent) -> bool {
        let pointer = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((id, hit)) = self.hit_test(mouse.column, mouse.row) else {
                    return false;
                };
                self.focus = Some(id.clone());
                let Some(start) = self.geometry(&id) else {
                    return false;
                };
                match hit {
                    FrameHit::Close => {
                        self.close(&id);
                    }
                    FrameHit::Header => {
                        self.grab = Some(PointerGrab::Move {
                            id,
                            anchor: pointer,
                            start,
                        });
                    }
                    FrameHit::Resize(edge) => {
                        self.grab = Some(PointerGrab::Resize {
                            id,
                            edge,
                            anchor: pointer,
                            start,
                        });
                    }
                    FrameHit::Content => {
                        self.forward_to(&id, event);
                    }
                    FrameHit::Border | FrameHit::Outside => {}
                }
                true
            }
            MouseEventKind::Drag(MouseButton::Left) if self.grab.is_some() => {
                self.apply_grab(pointer);
                true
            }
            MouseEventKind::Up(MouseButton::Left) if self.grab.is_some() => {
                self.apply_grab(pointer);
                if let Some(grab) = self.grab.take() {
                    tracing::debug!(
                        session = %grab.id(),
                        geometry = ?self.geometry(grab.id()),
                        "pointer released"
                    );
                }
                true
            }
            _ => match self.hit_test(mouse.column, mouse.row) {
                Some((id, FrameHit::Content)) => self.forward_to(&id, event),
                _ => false,
            },
        }
    }

    fn apply_grab(&mut self, pointer: (u16, u16)) {
        let viewport = self.viewport();
        let Some(grab) = self.grab.as_ref() else {
            return;
        };
        let Some(window) = self.windows.get_mut(grab.id()) else {
            self.grab = None;
            return;
        };
        let geometry = match grab {
            PointerGrab::Move { anchor, start, .. } => {
                WindowFrame::dragged(*start, DragDelta::between(*anchor, pointer), viewport)
            }
            PointerGrab::Resize {
                edge,
                anchor,
                start,
                ..
            } => window.frame.resized(
                *start,
                *edge,
                DragDelta::between(*anchor, pointer),
                viewport,
            ),
        };
        window.frame.set_geometry(geometry);
    }

    fn forward_to_focused(&mut self, event: &Event) -> bool {
        match self.focus.clone() {
            Some(id) => self.forward_to(&id, event),
            None => false,
        }
    }

    fn forward_to(&mut self, id: &SessionId, event: &Event) -> bool {
        let focused = self.focus.as_ref() == Some(id);
        let indicator = self
            .registry
            .get(id)
            .map(|s| s.status.indicator())
            .unwrap_or(StatusIndicator::Inactive);
        let Some(content) = self.windows.get_mut(id).and_then(|w| w.content.as_mut()) else {
            return false;
        };
        let ctx = ComponentContext::new(focused).with_indicator(indicator);
        content.handle_event(event, &ctx)
    }
}
