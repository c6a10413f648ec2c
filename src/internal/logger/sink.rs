// src/internal/logger/sink.rs

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::formatter::{ColorFormatter, FormatError};
use super::level::SeverityLevel;
use super::record::LogRecord;

/// How a file sink treats an existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    /// Truncate on open.
    #[default]
    Overwrite,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

impl ConsoleStream {
    pub fn is_terminal(self) -> bool {
        match self {
            ConsoleStream::Stdout => io::stdout().is_terminal(),
            ConsoleStream::Stderr => io::stderr().is_terminal(),
        }
    }
}

/// What a sink writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    Console(ConsoleStream),
    File(PathBuf),
    /// Any other writer, identified by a label.
    Writer(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// A destination with its own threshold and formatter.
///
/// Formatting and writing happen under one lock, so concurrent records never
/// interleave within a sink. Different sinks do not contend with each other.
pub struct Sink {
    kind: SinkKind,
    threshold: u16,
    formatter: ColorFormatter,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Sink {
    /// Console sink. Color survives only if `formatter` has it enabled and the
    /// stream is a terminal.
    pub fn console(
        stream: ConsoleStream,
        threshold: &SeverityLevel,
        formatter: ColorFormatter,
    ) -> Self {
        let interactive = stream.is_terminal();
        let color = formatter.color() && interactive;
        let writer: Box<dyn Write + Send> = match stream {
            ConsoleStream::Stdout => Box::new(io::stdout()),
            ConsoleStream::Stderr => Box::new(io::stderr()),
        };
        Self {
            kind: SinkKind::Console(stream),
            threshold: threshold.value(),
            formatter: formatter.with_color(color),
            writer: Mutex::new(writer),
        }
    }

    /// File sink, never colored. The file is opened here and stays open for
    /// the sink's lifetime.
    pub fn file(
        path: impl AsRef<Path>,
        mode: FileMode,
        threshold: &SeverityLevel,
        formatter: ColorFormatter,
    ) -> io::Result<Self> {
        let path = path.as_ref();
        let file = open_log_file(path, mode)?;
        Ok(Self {
            kind: SinkKind::File(path.to_path_buf()),
            threshold: threshold.value(),
            formatter: formatter.with_color(false),
            writer: Mutex::new(Box::new(file)),
        })
    }

    /// Sink over an arbitrary writer. `interactive` plays the role of the
    /// terminal check for color.
    pub fn writer(
        label: impl Into<String>,
        writer: impl Write + Send + 'static,
        interactive: bool,
        threshold: &SeverityLevel,
        formatter: ColorFormatter,
    ) -> Self {
        let color = formatter.color() && interactive;
        Self {
            kind: SinkKind::Writer(label.into()),
            threshold: threshold.value(),
            formatter: formatter.with_color(color),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn kind(&self) -> &SinkKind {
        &self.kind
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn formatter(&self) -> &ColorFormatter {
        &self.formatter
    }

    pub fn accepts(&self, level: &SeverityLevel) -> bool {
        level.value() >= self.threshold
    }

    /// Writes `record` if it clears the threshold. Returns whether it was written.
    pub fn emit(&self, record: &LogRecord) -> Result<bool, SinkError> {
        if !self.accepts(&record.level) {
            return Ok(false);
        }
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let line = self.formatter.format(record)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(true)
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("kind", &self.kind)
            .field("threshold", &self.threshold)
            .field("color", &self.formatter.color())
            .finish()
    }
}

/// Create or open a log file according to `mode`
fn open_log_file(path: &Path, mode: FileMode) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        FileMode::Append => options.append(true),
        FileMode::Overwrite => options.write(true).truncate(true),
    };
    options.open(path)
}

/// In-memory writer for capturing sink output.
///
/// Clones share the same buffer. Every `write` call is counted.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.writes.store(0, Ordering::SeqCst);
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
