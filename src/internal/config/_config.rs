use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::internal::instrument::FailurePolicy;
use crate::internal::logger::formatter::{DEFAULT_DATE_FORMAT, DEFAULT_MESSAGE_FORMAT};
use crate::internal::logger::{
    CallSiteStrategy, ColorFormatter, FileMode, LevelId, LevelRegistry, LogSettings, StyleTable,
    DEFAULT_SKIP_NAMES,
};

// Version information from build script - using option_env! for safety
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version information
pub fn get_version_info() -> String {
    let build_timestamp = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown");
    let build_date = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown");
    let rustc_semver = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");
    let cargo_target_triple = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");
    let os_version = option_env!("VERGEN_SYSINFO_OS_VERSION").unwrap_or("unknown");

    format!(
        "toolbox version {}\n\
         Built: {} ({}) on {}\n\
         Rust: {}\n\
         Target: {}",
        VERSION, build_date, build_timestamp, os_version, rustc_semver, cargo_target_triple
    )
}

/// Options for one logger set up through `Logging::setup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: LevelId,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Console only when absent.
    #[serde(default)]
    pub out_file: Option<PathBuf>,
    #[serde(default)]
    pub file_mode: FileMode,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            level: default_level(),
            format: default_format(),
            date_format: default_date_format(),
            out_file: None,
            file_mode: FileMode::default(),
        }
    }
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<LevelId>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub fn with_out_file(mut self, out_file: impl Into<PathBuf>) -> Self {
        self.out_file = Some(out_file.into());
        self
    }

    pub fn with_file_mode(mut self, file_mode: FileMode) -> Self {
        self.file_mode = file_mode;
        self
    }
}

fn default_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}
fn default_level() -> LevelId {
    LevelId::Name("DEBUG".to_string())
}
fn default_format() -> String {
    DEFAULT_MESSAGE_FORMAT.to_string()
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_true() -> bool {
    true
}

/// CallSiteMode selects how records are attributed to their origin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CallSiteMode {
    #[serde(rename = "stack_walk")]
    #[default]
    StackWalk,
    #[serde(rename = "track_caller")]
    TrackCaller,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub call_sites: CallSiteMode,
    /// Replaces the default skip list of the stack walk.
    #[serde(default)]
    pub skip_names: Option<Vec<String>>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: LevelId,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub out_file: Option<PathBuf>,
    #[serde(default)]
    pub file_mode: FileMode,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: true,
            call_sites: CallSiteMode::default(),
            skip_names: None,
            failure_policy: FailurePolicy::default(),
            name: default_name(),
            level: default_level(),
            format: default_format(),
            date_format: default_date_format(),
            out_file: None,
            file_mode: FileMode::default(),
        }
    }
}

impl LoggingConfig {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            name: self.name.clone(),
            level: self.level.clone(),
            format: self.format.clone(),
            date_format: self.date_format.clone(),
            out_file: self.out_file.clone(),
            file_mode: self.file_mode,
        }
    }

    pub fn call_site_strategy(&self) -> CallSiteStrategy {
        match self.call_sites {
            CallSiteMode::TrackCaller => CallSiteStrategy::TrackCaller,
            CallSiteMode::StackWalk => CallSiteStrategy::StackWalk {
                skip_names: self.skip_names.clone().unwrap_or_else(|| {
                    DEFAULT_SKIP_NAMES.iter().map(|s| s.to_string()).collect()
                }),
            },
        }
    }

    /// Settings for a `Logging` context built from this section.
    pub fn settings(&self) -> LogSettings {
        LogSettings {
            enabled: self.enabled,
            color: self.color,
            call_sites: self.call_site_strategy(),
            registry: LevelRegistry::standard(),
            styles: StyleTable::standard(),
        }
    }

    /// Checks the level, templates and date format without touching any logger.
    pub fn validate(&self) -> Result<(), ConfigError> {
        LevelRegistry::standard()
            .resolve(&self.level)
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        ColorFormatter::new(&self.format, &self.date_format, StyleTable::standard())
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Defaults, then `toolbox.*` in the working directory, then
    /// `/etc/toolbox/config.*`, then `path` if given, then `TOOLBOX_*`
    /// environment variables (`TOOLBOX_LOGGING__LEVEL=info`).
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config_builder = Config::builder()
            // Start with default values
            .set_default("logging.enabled", true)?
            .set_default("logging.color", true)?
            .set_default("logging.level", "DEBUG")?
            .set_default("logging.format", DEFAULT_MESSAGE_FORMAT)?
            .set_default("logging.date_format", DEFAULT_DATE_FORMAT)?
            // Load config files in order of precedence
            .add_source(File::with_name("toolbox").required(false))
            .add_source(File::with_name("/etc/toolbox/config").required(false));

        if let Some(path) = path {
            config_builder = config_builder.add_source(File::with_name(path).required(true));
        }

        // Environment variables
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("TOOLBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = config_builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.logging.validate()?;

        Ok(app_config)
    }
}
