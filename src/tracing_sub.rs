use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Arc;

use crate::config::LogConfig;

/// Per-event writer handed out by `SubscriberMakeWriter`.
///
/// The UI owns the terminal's alternate screen, so logs go to a file when
/// one is configured and are discarded otherwise.
pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<File>),
    Sink(io::Sink),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => file.as_ref().write(buf),
            DelegatingInner::Sink(sink) => sink.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => file.as_ref().flush(),
            DelegatingInner::Sink(sink) => sink.flush(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<File>>,
}

impl SubscriberMakeWriter {
    pub fn sink() -> Self {
        Self::default()
    }

    pub fn file(file: File) -> Self {
        Self {
            file: Some(Arc::new(file)),
        }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match &self.file {
            Some(file) => DelegatingInner::File(Arc::clone(file)),
            None => DelegatingInner::Sink(io::sink()),
        };
        DelegatingWriter { inner }
    }
}

/// Install the global subscriber described by `config`.
///
/// Only the log file can fail to open. Calling this again after a subscriber
/// is installed leaves the first one in place.
pub fn init(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.file {
        Some(path) => SubscriberMakeWriter::file(
            OpenOptions::new().create(true).append(true).open(path)?,
        ),
        None => SubscriberMakeWriter::sink(),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .compact()
        .try_init();
    Ok(())
}
