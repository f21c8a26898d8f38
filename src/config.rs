//! Command-line configuration for the `term-sessions` binary.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use thiserror::Error;
use tracing::Level;

use crate::constants::{
    DEFAULT_CONNECT_COMMAND, DEFAULT_MIN_WINDOW_SIZE, DEFAULT_POLL_MS, DEFAULT_WINDOW_SIZE,
    INSTANCE_PLACEHOLDER, PTY_SCROLLBACK_LEN,
};
use crate::host::WindowDefaults;
use crate::layout::{ResizeEdge, Size};
use crate::session::InstanceRef;
use crate::window::frame::DEFAULT_ICON;

/// Smallest window that still has a header, a content row and a bottom border.
const MIN_FRAME: Size = Size {
    width: 12,
    height: 3,
};

const KEYS_HELP: &str = indoc! {"
    Keys:
      Ctrl+N   open another session on the focused instance
      Ctrl+W   close the focused session
      Ctrl+Q   quit

    Mouse:
      drag a window header to move it, drag the corner grip to resize,
      click [x] to close.
"};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("connect command is empty")]
    EmptyCommand,
    #[error("connect command could not be parsed: {0}")]
    InvalidCommand(#[from] shell_words::ParseError),
    #[error("minimum window size {width}x{height} is below {min_width}x{min_height}")]
    MinSizeTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
    #[error("poll interval must be between 1 and 1000 ms, got {0}")]
    PollInterval(u64),
    #[error("unknown log level `{0}`")]
    LogLevel(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "term-sessions",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating terminal session windows for remote compute instances",
    after_help = KEYS_HELP
)]
pub struct Cli {
    /// Instances to open a session for at startup.
    #[arg(value_name = "INSTANCE", required = true)]
    pub instances: Vec<String>,

    /// Command run for each session; `{instance}` is replaced with the instance id.
    #[arg(
        short = 'c',
        long = "command",
        value_name = "TEMPLATE",
        default_value = DEFAULT_CONNECT_COMMAND
    )]
    pub command: String,

    /// Initial window width in cells.
    #[arg(long = "width", default_value_t = DEFAULT_WINDOW_SIZE.width)]
    pub width: u16,

    /// Initial window height in cells.
    #[arg(long = "height", default_value_t = DEFAULT_WINDOW_SIZE.height)]
    pub height: u16,

    #[arg(long = "min-width", default_value_t = DEFAULT_MIN_WINDOW_SIZE.width)]
    pub min_width: u16,

    #[arg(long = "min-height", default_value_t = DEFAULT_MIN_WINDOW_SIZE.height)]
    pub min_height: u16,

    /// Allow resizing from every edge and corner instead of only bottom-right.
    #[arg(long = "all-edges")]
    pub all_edges: bool,

    /// Icon drawn before each window title.
    #[arg(long = "icon", default_value = DEFAULT_ICON)]
    pub icon: String,

    /// Rows of scrollback kept per session.
    #[arg(long = "scrollback", value_name = "ROWS", default_value_t = PTY_SCROLLBACK_LEN)]
    pub scrollback: usize,

    /// Input poll interval in milliseconds.
    #[arg(long = "poll-ms", value_name = "MS", default_value_t = DEFAULT_POLL_MS)]
    pub poll_ms: u64,

    /// Write logs to this file. Logs are discarded otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Program and arguments of the connect command, with the instance
/// placeholder still in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    words: Vec<String>,
}

impl CommandTemplate {
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let words = shell_words::split(template)?;
        if words.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        Ok(Self { words })
    }

    pub fn program(&self) -> &str {
        self.words.first().map(String::as_str).unwrap_or_default()
    }

    /// Program followed by its arguments with the placeholder substituted.
    pub fn render(&self, instance: &InstanceRef) -> Vec<String> {
        self.words
            .iter()
            .map(|word| word.replace(INSTANCE_PLACEHOLDER, instance.as_str()))
            .collect()
    }
}

impl FromStr for CommandTemplate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: Level,
}

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub instances: Vec<InstanceRef>,
    pub command: CommandTemplate,
    pub windows: WindowDefaults,
    pub scrollback: usize,
    pub poll_interval: Duration,
    pub log: LogConfig,
}

impl TryFrom<&Cli> for HostConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if cli.min_width < MIN_FRAME.width || cli.min_height < MIN_FRAME.height {
            return Err(ConfigError::MinSizeTooSmall {
                width: cli.min_width,
                height: cli.min_height,
                min_width: MIN_FRAME.width,
                min_height: MIN_FRAME.height,
            });
        }
        if !(1..=1000).contains(&cli.poll_ms) {
            return Err(ConfigError::PollInterval(cli.poll_ms));
        }
        let level = Level::from_str(&cli.log_level)
            .map_err(|_| ConfigError::LogLevel(cli.log_level.clone()))?;
        let resize_edges = if cli.all_edges {
            ResizeEdge::ALL.to_vec()
        } else {
            vec![ResizeEdge::BottomRight]
        };
        Ok(Self {
            instances: cli.instances.iter().map(InstanceRef::new).collect(),
            command: CommandTemplate::parse(&cli.command)?,
            windows: WindowDefaults {
                initial_size: Size::new(cli.width, cli.height),
                min_size: Size::new(cli.min_width, cli.min_height),
                resize_edges,
                icon: cli.icon.clone(),
            },
            scrollback: cli.scrollback,
            poll_interval: Duration::from_millis(cli.poll_ms),
            log: LogConfig {
                file: cli.log_file.clone(),
                level,
            },
        })
    }
}
