pub mod registry;
pub mod status;

pub use registry::{RegistrySnapshot, SessionRegistry};
pub use status::{
    ConnectionReport, ConnectionStatus, StatusIndicator, StatusMessage, StatusSender,
    StatusTracker,
};

use std::fmt;
use std::sync::Arc;

/// Opaque reference to the compute instance a session connects to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceRef(Arc<str>);

impl InstanceRef {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for InstanceRef {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// Identity of one open terminal window.
///
/// Built from the target instance and a registry-wide sequence number, so two
/// windows on the same instance never share an id. Ordering follows the
/// sequence number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId {
    seq: u64,
    instance: InstanceRef,
}

impl SessionId {
    pub(crate) fn new(instance: InstanceRef, seq: u64) -> Self {
        Self { seq, instance }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn instance(&self) -> &InstanceRef {
        &self.instance
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terminal-{}-{}", self.instance, self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub instance: InstanceRef,
    pub status: ConnectionStatus,
}
