//! Shared crate-wide constants.

use crate::layout::Size;

/// Size a new session window asks for before it is centered in the viewport.
///
/// Units: terminal cells. Large enough for a typical 80-column shell plus the
/// frame border on each side.
pub const DEFAULT_WINDOW_SIZE: Size = Size {
    width: 90,
    height: 26,
};

/// Smallest size a session window may be resized to.
///
/// Leaves room for the header (icon, a short title, the status label and the
/// close button) and a few rows of terminal output.
pub const DEFAULT_MIN_WINDOW_SIZE: Size = Size {
    width: 40,
    height: 8,
};

/// Rows reserved at the bottom of the screen for the host status bar.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Placeholder in the connect command template replaced with the instance id.
pub const INSTANCE_PLACEHOLDER: &str = "{instance}";

/// Command template used when none is configured.
pub const DEFAULT_CONNECT_COMMAND: &str = "ssh {instance}";

/// Poll interval of the UI event loop in milliseconds.
pub const DEFAULT_POLL_MS: u64 = 16;

/// Scrollback kept by the vt100 parser of each PTY-backed session.
pub const PTY_SCROLLBACK_LEN: usize = 1000;
