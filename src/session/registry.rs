//! Insertion-ordered registry of open terminal sessions.
//!
//! The registry never mutates a snapshot in place. Every `open`, `close` and
//! `update_status` builds a new `RegistrySnapshot` from the current one and
//! swaps it in, so a snapshot held by a renderer or a late callback is never
//! changed underneath it, and every mutation starts from the latest state.

use std::sync::Arc;

use super::{ConnectionStatus, InstanceRef, Session, SessionId};

/// Immutable view of the registry at one point in time.
///
/// Order is insertion order, which is also window stacking order: the last
/// session is drawn on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    sessions: Vec<Session>,
}

impl RegistrySnapshot {
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| &session.id == id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|s| s.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn position(&self, id: &SessionId) -> Option<usize> {
        self.sessions.iter().position(|session| &session.id == id)
    }
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    current: Arc<RegistrySnapshot>,
    next_seq: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh session for `instance`, starting `Disconnected`.
    pub fn open(&mut self, instance: impl Into<InstanceRef>) -> SessionId {
        let instance = instance.into();
        let seq = self.next_seq;
        self.next_seq = seq.saturating_add(1);
        let id = SessionId::new(instance.clone(), seq);
        let session = Session {
            id: id.clone(),
            instance,
            status: ConnectionStatus::Disconnected,
        };
        self.replace(|next| next.sessions.push(session));
        tracing::debug!(session = %id, "opened session");
        id
    }

    /// Remove `id`. Closing an unknown id is a no-op.
    pub fn close(&mut self, id: &SessionId) {
        let Some(idx) = self.current.position(id) else {
            tracing::debug!(session = %id, "close ignored for unknown session");
            return;
        };
        self.replace(|next| {
            next.sessions.remove(idx);
        });
        tracing::debug!(session = %id, "closed session");
    }

    /// Record `status` for `id`. Updates for unknown ids are dropped, which
    /// covers transports reporting after their window was closed.
    pub fn update_status(&mut self, id: &SessionId, status: ConnectionStatus) {
        let Some(idx) = self.current.position(id) else {
            tracing::warn!(session = %id, ?status, "status update for unknown session");
            return;
        };
        if self.current.sessions[idx].status == status {
            return;
        }
        self.replace(|next| next.sessions[idx].status = status);
    }

    pub fn list(&self) -> &[Session] {
        self.current.sessions()
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.current.get(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.current.contains(id)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Cheap handle on the current state. Later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current)
    }

    fn replace<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut RegistrySnapshot),
    {
        let mut next = RegistrySnapshot::clone(&self.current);
        edit(&mut next);
        self.current = Arc::new(next);
    }
}
