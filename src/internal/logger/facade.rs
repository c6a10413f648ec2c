// src/internal/logger/facade.rs

use std::collections::HashMap;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::callsite::{CallSite, CallSiteStrategy};
use super::colors::StyleTable;
use super::formatter::{ColorFormatter, FormatError};
use super::level::{self, LevelError, LevelRegistry, SeverityLevel, NOTSET};
use super::record::LogRecord;
use super::sink::{ConsoleStream, Sink};
use crate::internal::config::LoggerConfig;

pub const ROOT_LOGGER_NAME: &str = "root";

/// Everything that used to be process-wide logging state.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// When off, `setup` returns `None` and every log call is a no-op.
    pub enabled: bool,
    /// Global color switch; consoles still need to be terminals.
    pub color: bool,
    pub call_sites: CallSiteStrategy,
    pub registry: LevelRegistry,
    pub styles: StyleTable,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: true,
            call_sites: CallSiteStrategy::default(),
            registry: LevelRegistry::standard(),
            styles: StyleTable::standard(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("failed to open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0:?} names the root logger; pass as_root = true to configure it")]
    RootName(String),
}

// State shared by every logger of one `Logging` context.
#[derive(Debug)]
struct Shared {
    enabled: bool,
    call_sites: CallSiteStrategy,
}

struct LoggerInner {
    name: RwLock<String>,
    level: AtomicU16,
    propagate: AtomicBool,
    sinks: RwLock<Vec<Arc<Sink>>>,
    parent: RwLock<Option<Logger>>,
    shared: Arc<Shared>,
}

/// Cheap, cloneable handle to a named logger.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .field("propagate", &self.propagate())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

impl Logger {
    fn new(name: &str, level: u16, parent: Option<Logger>, shared: Arc<Shared>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: RwLock::new(name.to_string()),
                level: AtomicU16::new(level),
                propagate: AtomicBool::new(parent.is_some()),
                sinks: RwLock::new(Vec::new()),
                parent: RwLock::new(parent),
                shared,
            }),
        }
    }

    pub fn name(&self) -> String {
        self.inner
            .name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_name(&self, name: &str) {
        *self.inner.name.write().unwrap_or_else(PoisonError::into_inner) = name.to_string();
    }

    /// Own threshold; [`NOTSET`] means inherited.
    pub fn level(&self) -> u16 {
        self.inner.level.load(Ordering::Relaxed)
    }

    pub fn set_level(&self, level: &SeverityLevel) {
        self.inner.level.store(level.value(), Ordering::Relaxed);
    }

    /// First non-NOTSET level up the parent chain.
    pub fn effective_level(&self) -> u16 {
        let mut current = Some(self.clone());
        while let Some(logger) = current {
            let level = logger.level();
            if level != NOTSET {
                return level;
            }
            current = logger.parent();
        }
        NOTSET
    }

    pub fn is_enabled_for(&self, level: &SeverityLevel) -> bool {
        self.inner.shared.enabled && level.value() >= self.effective_level()
    }

    pub fn propagate(&self) -> bool {
        self.inner.propagate.load(Ordering::Relaxed)
    }

    pub fn set_propagate(&self, propagate: bool) {
        self.inner.propagate.store(propagate, Ordering::Relaxed);
    }

    pub fn parent(&self) -> Option<Logger> {
        self.inner
            .parent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_parent(&self, parent: Option<Logger>) {
        *self
            .inner
            .parent
            .write()
            .unwrap_or_else(PoisonError::into_inner) = parent;
    }

    pub fn add_sink(&self, sink: Arc<Sink>) {
        self.inner
            .sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sink);
    }

    /// Detaches every sink. Sinks not shared elsewhere are dropped, which
    /// closes their files.
    pub fn clear_sinks(&self) {
        self.inner
            .sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn sink_count(&self) -> usize {
        self.inner
            .sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn sinks(&self) -> Vec<Arc<Sink>> {
        self.inner
            .sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn descends_from(&self, ancestor: &Logger) -> bool {
        let mut current = self.parent();
        while let Some(logger) = current {
            if logger.ptr_eq(ancestor) {
                return true;
            }
            current = logger.parent();
        }
        false
    }

    /// Logs `message` at `level`, attributing it with the context's call-site
    /// strategy.
    #[track_caller]
    pub fn log(&self, level: &SeverityLevel, message: impl AsRef<str>) {
        let location = Location::caller();
        if !self.is_enabled_for(level) {
            return;
        }
        let call_site = self.inner.shared.call_sites.resolve(location);
        self.dispatch(LogRecord::new(
            self.name(),
            level.clone(),
            message.as_ref(),
            call_site,
        ));
    }

    /// Logs with an explicitly supplied call site; nothing is resolved.
    pub fn log_at(&self, level: &SeverityLevel, message: impl AsRef<str>, call_site: CallSite) {
        if !self.is_enabled_for(level) {
            return;
        }
        self.dispatch(LogRecord::new(
            self.name(),
            level.clone(),
            message.as_ref(),
            call_site,
        ));
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(&level::DEBUG, message)
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(&level::INFO, message)
    }

    #[track_caller]
    pub fn success(&self, message: impl AsRef<str>) {
        self.log(&level::SUCCESS, message)
    }

    #[track_caller]
    pub fn failure(&self, message: impl AsRef<str>) {
        self.log(&level::FAILURE, message)
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(&level::WARNING, message)
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(&level::ERROR, message)
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(&level::CRITICAL, message)
    }

    #[track_caller]
    pub fn flag(&self, message: impl AsRef<str>) {
        self.log(&level::FLAG, message)
    }

    // Own sinks first, then ancestors while propagation allows. Ancestor levels
    // are not consulted, only their sinks' thresholds.
    fn dispatch(&self, record: LogRecord) {
        let mut found = 0usize;
        let mut current = Some(self.clone());
        while let Some(logger) = current {
            let sinks = logger.sinks();
            found += sinks.len();
            for sink in sinks {
                if let Err(e) = sink.emit(&record) {
                    eprintln!("--- logging error in {:?}: {}", sink.kind(), e);
                }
            }
            if !logger.propagate() {
                break;
            }
            current = logger.parent();
        }

        if found == 0 && record.level.value() >= level::WARNING.value() {
            eprintln!("{}", record.message);
        }
    }
}

/// The composition root of a logging setup: the root logger, named loggers,
/// and the settings they all share.
pub struct Logging {
    settings: LogSettings,
    shared: Arc<Shared>,
    root: Logger,
    loggers: Mutex<HashMap<String, Logger>>,
}

impl Default for Logging {
    fn default() -> Self {
        Self::new(LogSettings::default())
    }
}

impl Logging {
    /// The root starts with no sinks at WARNING: until configured, records
    /// below WARNING are dropped and the rest fall through to stderr.
    pub fn new(settings: LogSettings) -> Self {
        let shared = Arc::new(Shared {
            enabled: settings.enabled,
            call_sites: settings.call_sites.clone(),
        });
        let root = Logger::new(
            ROOT_LOGGER_NAME,
            level::WARNING.value(),
            None,
            shared.clone(),
        );
        Self {
            settings,
            shared,
            root,
            loggers: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &LogSettings {
        &self.settings
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.settings.registry
    }

    pub fn root(&self) -> Logger {
        self.root.clone()
    }

    /// Returns the logger called `name`, creating it as a child of the root.
    /// An empty name or `"root"` yields the root logger.
    pub fn get_logger(&self, name: &str) -> Logger {
        if name.is_empty() || name == ROOT_LOGGER_NAME {
            return self.root();
        }
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        loggers
            .entry(name.to_string())
            .or_insert_with(|| {
                Logger::new(name, NOTSET, Some(self.root.clone()), self.shared.clone())
            })
            .clone()
    }

    /// Resolves where the caller of the caller came from, per the configured
    /// strategy.
    #[track_caller]
    pub fn resolve_call_site(&self) -> CallSite {
        self.settings.call_sites.resolve(Location::caller())
    }

    /// Configures a logger from `config`.
    ///
    /// With `as_root`, every sink already on the root is detached first, the
    /// root is renamed after the calling file, and it gets a console sink on
    /// stderr plus a file sink when `out_file` is set. Propagation is off.
    ///
    /// Otherwise the logger `config.name` is parented to a logger named after
    /// the calling file (a child of the root), gets only the optional file
    /// sink, replaces any sinks from an earlier setup, and propagates.
    ///
    /// Returns `Ok(None)` when logging is disabled.
    #[track_caller]
    pub fn setup(
        &self,
        config: &LoggerConfig,
        as_root: bool,
    ) -> Result<Option<Logger>, SetupError> {
        let caller = caller_script_name(Location::caller());
        if !self.settings.enabled {
            return Ok(None);
        }

        let level = self.settings.registry.resolve(&config.level)?;
        self.settings.styles.ensure_covers(&self.settings.registry)?;
        let formatter = ColorFormatter::new(
            &config.format,
            &config.date_format,
            self.settings.styles.clone(),
        )?;

        // reject before the file sink can truncate anything
        let named = if as_root {
            None
        } else {
            let logger = self.get_logger(&config.name);
            if logger.ptr_eq(&self.root) {
                return Err(SetupError::RootName(config.name.clone()));
            }
            Some(logger)
        };

        let file_sink = match &config.out_file {
            Some(path) => {
                let sink = Sink::file(path, config.file_mode, &level, formatter.clone()).map_err(
                    |source| SetupError::Io {
                        path: path.clone(),
                        source,
                    },
                )?;
                Some(Arc::new(sink))
            }
            None => None,
        };

        let logger = match named {
            None => {
                let root = self.root();
                root.clear_sinks();
                root.set_name(&caller);
                if let Some(sink) = file_sink {
                    root.add_sink(sink);
                }
                root.add_sink(Arc::new(Sink::console(
                    ConsoleStream::Stderr,
                    &level,
                    formatter.with_color(self.settings.color),
                )));
                root.set_propagate(false);
                root
            }
            Some(logger) => {
                // never build a cycle in the parent chain
                let script = self.get_logger(&caller);
                let parent = if script.ptr_eq(&logger) || script.descends_from(&logger) {
                    self.root()
                } else {
                    script
                };
                logger.set_parent(Some(parent));
                logger.clear_sinks();
                if let Some(sink) = file_sink {
                    logger.add_sink(sink);
                }
                logger.set_propagate(true);
                logger
            }
        };

        logger.set_level(&level);
        Ok(Some(logger))
    }

    /// Logs `message` on `logger`, or on the root when none is given.
    #[track_caller]
    pub fn log_message(&self, message: &str, level: &SeverityLevel, logger: Option<&Logger>) {
        match logger {
            Some(logger) => logger.log(level, message),
            None => self.root.log(level, message),
        }
    }
}

/// File stem of the calling source file, e.g. `main` for `src/main.rs`.
fn caller_script_name(location: &Location<'_>) -> String {
    Path::new(location.file())
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.file().to_string())
}

// Convenience logging macros
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_success {
    ($logger:expr, $($arg:tt)*) => {
        $logger.success(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_failure {
    ($logger:expr, $($arg:tt)*) => {
        $logger.failure(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warning(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($arg:tt)*) => {
        $logger.critical(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_flag {
    ($logger:expr, $($arg:tt)*) => {
        $logger.flag(format!($($arg)*))
    };
}
