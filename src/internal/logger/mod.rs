// src/internal/logger/mod.rs

pub mod bridge;
pub mod callsite;
pub mod colors;
pub mod facade;
pub mod formatter;
pub mod level;
pub mod record;
pub mod sink;

pub use bridge::{capture_tracing, TracingBridge};
pub use callsite::{resolve_caller, CallSite, CallSiteStrategy, FrameInfo, DEFAULT_SKIP_NAMES};
pub use colors::{Colors, Style, StyleTable};
pub use facade::{LogSettings, Logger, Logging, SetupError, ROOT_LOGGER_NAME};
pub use formatter::{ColorFormatter, FormatError};
pub use level::{LevelError, LevelId, LevelRegistry, SeverityLevel};
pub use record::LogRecord;
pub use sink::{ConsoleStream, FileMode, MemoryWriter, Sink, SinkError, SinkKind};

// Note: The log_* macros are exported at the crate root via #[macro_export]
// They can be accessed directly as toolbox::log_info!, toolbox::log_success!, etc.
