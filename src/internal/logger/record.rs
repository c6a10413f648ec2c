// src/internal/logger/record.rs

use chrono::{DateTime, Local};

use super::callsite::CallSite;
use super::level::SeverityLevel;

/// A single log event on its way to the sinks.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Name of the logger the call was made on.
    pub logger: String,
    pub level: SeverityLevel,
    pub message: String,
    pub call_site: CallSite,
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(
        logger: impl Into<String>,
        level: SeverityLevel,
        message: impl Into<String>,
        call_site: CallSite,
    ) -> Self {
        Self {
            logger: logger.into(),
            level,
            message: message.into(),
            call_site,
            timestamp: Local::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
