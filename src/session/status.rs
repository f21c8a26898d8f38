//! Per-session connection status fed by terminal transports.
//!
//! Transports never touch the registry. Each session gets a `StatusSender`
//! bound to its id; the UI thread drains the shared channel once per loop
//! turn and writes each message into the registry. Whatever arrives last
//! wins, including stale messages that arrive out of order.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use ratatui::style::Color;

use super::{SessionId, SessionRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error {
        message: String,
    },
}

impl ConnectionStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn indicator(&self) -> StatusIndicator {
        match self {
            Self::Connecting => StatusIndicator::Pending,
            Self::Connected => StatusIndicator::Active,
            Self::Disconnected => StatusIndicator::Inactive,
            Self::Error { .. } => StatusIndicator::Error,
        }
    }

    /// Whether moving from `self` to `next` is one of the transitions a
    /// well-behaved transport produces. Other transitions are still applied.
    pub fn expects(&self, next: &ConnectionStatus) -> bool {
        use ConnectionStatus::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Error { .. })
                | (Connecting, Disconnected)
                | (Connected, Error { .. })
                | (Connected, Disconnected)
                | (Error { .. }, Connecting)
                | (Error { .. }, Disconnected)
        ) || self == next
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Connecting => f.write_str("connecting"),
            Self::Connected => f.write_str("connected"),
            Self::Error { message } => write!(f, "error: {message}"),
        }
    }
}

/// Rendering hint for the status indicator in a window header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Pending,
    Active,
    Inactive,
    Error,
}

impl StatusIndicator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pending => "◌",
            Self::Active => "●",
            Self::Inactive => "○",
            Self::Error => "✖",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Pending => crate::theme::status_pending(),
            Self::Active => crate::theme::status_active(),
            Self::Inactive => crate::theme::status_inactive(),
            Self::Error => crate::theme::status_error(),
        }
    }
}

/// Status as reported by a transport callback.
///
/// Converted with precedence error, connected, connecting, then disconnected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionReport {
    pub is_connected: bool,
    pub is_connecting: bool,
    pub connection_error: Option<String>,
}

impl From<ConnectionReport> for ConnectionStatus {
    fn from(report: ConnectionReport) -> Self {
        if let Some(message) = report.connection_error {
            ConnectionStatus::Error { message }
        } else if report.is_connected {
            ConnectionStatus::Connected
        } else if report.is_connecting {
            ConnectionStatus::Connecting
        } else {
            ConnectionStatus::Disconnected
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub session: SessionId,
    pub status: ConnectionStatus,
}

/// Sending half handed to a transport for one session.
#[derive(Debug, Clone)]
pub struct StatusSender {
    session: SessionId,
    tx: Sender<StatusMessage>,
}

impl StatusSender {
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Queue `status` for this session. Returns false once the tracker is gone.
    pub fn send(&self, status: ConnectionStatus) -> bool {
        self.tx
            .send(StatusMessage {
                session: self.session.clone(),
                status,
            })
            .is_ok()
    }

    pub fn report(&self, report: ConnectionReport) -> bool {
        self.send(report.into())
    }
}

#[derive(Debug)]
pub struct StatusTracker {
    tx: Sender<StatusMessage>,
    rx: Receiver<StatusMessage>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender_for(&self, session: SessionId) -> StatusSender {
        StatusSender {
            session,
            tx: self.tx.clone(),
        }
    }

    /// Take every queued message without applying it.
    pub fn drain(&self) -> Vec<StatusMessage> {
        self.rx.try_iter().collect()
    }

    /// Apply every queued message to `registry` in arrival order.
    ///
    /// Each write goes through the registry's latest snapshot. Messages for
    /// closed sessions fall through as registry no-ops. Returns how many
    /// messages were consumed.
    pub fn apply_pending(&self, registry: &mut SessionRegistry) -> usize {
        let mut consumed = 0;
        for message in self.rx.try_iter() {
            consumed += 1;
            if let Some(current) = registry.get(&message.session)
                && !current.status.expects(&message.status)
            {
                tracing::debug!(
                    session = %message.session,
                    from = %current.status,
                    to = %message.status,
                    "applying out-of-order status"
                );
            }
            registry.update_status(&message.session, message.status);
        }
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn indicator_maps_each_status() {
        assert_eq!(
            ConnectionStatus::Connecting.indicator(),
            StatusIndicator::Pending
        );
        assert_eq!(
            ConnectionStatus::Connected.indicator(),
            StatusIndicator::Active
        );
        assert_eq!(
            ConnectionStatus::Disconnected.indicator(),
            StatusIndicator::Inactive
        );
        assert_eq!(
            ConnectionStatus::error("x").indicator(),
            StatusIndicator::Error
        );
    }

    #[test]
    fn report_conversion_precedence() {
        let both = ConnectionReport {
            is_connected: true,
            is_connecting: true,
            connection_error: None,
        };
        assert_eq!(ConnectionStatus::from(both), ConnectionStatus::Connected);
        let failed = ConnectionReport {
            is_connected: true,
            is_connecting: false,
            connection_error: Some("reset".into()),
        };
        assert_eq!(
            ConnectionStatus::from(failed),
            ConnectionStatus::error("reset")
        );
        assert_eq!(
            ConnectionStatus::from(ConnectionReport::default()),
            ConnectionStatus::Disconnected
        );
    }

    #[test]
    fn last_write_wins_even_when_stale() {
        let mut reg = SessionRegistry::new();
        let id = reg.open("i-1");
        let tracker = StatusTracker::new();
        let tx = tracker.sender_for(id.clone());
        tx.send(ConnectionStatus::Connecting);
        tx.send(ConnectionStatus::Connected);
        // stale message delivered late
        tx.send(ConnectionStatus::Connecting);
        assert_eq!(tracker.apply_pending(&mut reg), 3);
        assert_eq!(
            reg.get(&id).map(|s| s.status.clone()),
            Some(ConnectionStatus::Connecting)
        );
    }

    #[test]
    fn messages_after_close_are_dropped() {
        let mut reg = SessionRegistry::new();
        let a = reg.open("i-1");
        let b = reg.open("i-2");
        let tracker = StatusTracker::new();
        let tx_a = tracker.sender_for(a.clone());
        let tx_b = tracker.sender_for(b.clone());
        tx_b.send(ConnectionStatus::Connected);
        reg.close(&a);
        tx_a.send(ConnectionStatus::error("late"));
        tracker.apply_pending(&mut reg);
        assert!(!reg.contains(&a));
        assert_eq!(
            reg.get(&b).map(|s| s.status.clone()),
            Some(ConnectionStatus::Connected)
        );
    }

    #[test]
    fn senders_work_across_threads() {
        let mut reg = SessionRegistry::new();
        let id = reg.open("i-1");
        let tracker = StatusTracker::new();
        let tx = tracker.sender_for(id.clone());
        let handle = thread::spawn(move || {
            tx.report(ConnectionReport {
                is_connected: true,
                ..ConnectionReport::default()
            })
        });
        assert!(handle.join().unwrap());
        tracker.apply_pending(&mut reg);
        assert_eq!(reg.get(&id).unwrap().status, ConnectionStatus::Connected);
    }

    #[test]
    fn send_fails_after_tracker_dropped() {
        let mut reg = SessionRegistry::new();
        let id = reg.open("i-1");
        let tracker = StatusTracker::new();
        let tx = tracker.sender_for(id);
        drop(tracker);
        assert!(!tx.send(ConnectionStatus::Connected));
    }

    #[test]
    fn expected_transitions() {
        use ConnectionStatus::*;
        assert!(Disconnected.expects(&Connecting));
        assert!(Connecting.expects(&Connected));
        assert!(Connected.expects(&ConnectionStatus::error("drop")));
        assert!(!Connected.expects(&Connecting));
        assert!(!Disconnected.expects(&Connected));
    }
}
