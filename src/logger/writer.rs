//! Log writer module
//!
//! Output target for the tracing subscriber: an append-mode file, or stdout.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing_subscriber::fmt::MakeWriter;

/// Writer handed out per event
pub enum LogTarget {
    Stdout,
    File(File),
}

impl Write for LogTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout => io::stdout().lock().write(buf),
            Self::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().flush(),
            Self::File(f) => f.flush(),
        }
    }
}

/// Makes writers for the configured log destination
pub struct LogDestination {
    file: Option<File>,
}

impl LogDestination {
    pub const fn stdout() -> Self {
        Self { file: None }
    }

    pub fn file(path: &str) -> io::Result<Self> {
        Ok(Self {
            file: Some(open_log_file(path)?),
        })
    }
}

impl<'a> MakeWriter<'a> for LogDestination {
    type Writer = LogTarget;

    fn make_writer(&'a self) -> Self::Writer {
        // A failed clone degrades to stdout rather than dropping the line
        self.file
            .as_ref()
            .and_then(|f| f.try_clone().ok())
            .map_or(LogTarget::Stdout, LogTarget::File)
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
