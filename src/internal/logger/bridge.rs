// src/internal/logger/bridge.rs

//! Routes `tracing` events into a [`Logger`].
//!
//! Libraries that report through `tracing` end up in the same sinks, with the
//! same colors and thresholds, as records logged directly.
//!
//! | tracing         | severity |
//! |-----------------|----------|
//! | `TRACE`/`DEBUG` | DEBUG    |
//! | `INFO`          | INFO     |
//! | `WARN`          | WARNING  |
//! | `ERROR`         | ERROR    |

use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::EnvFilter;

use super::callsite::{basename, CallSite};
use super::facade::Logger;
use super::level::{self, SeverityLevel};

/// A tracing layer that forwards every event it sees to a [`Logger`].
pub struct TracingBridge {
    logger: Logger,
}

impl TracingBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn severity_for(level: &Level) -> SeverityLevel {
        match *level {
            Level::TRACE | Level::DEBUG => level::DEBUG,
            Level::INFO => level::INFO,
            Level::WARN => level::WARNING,
            Level::ERROR => level::ERROR,
        }
    }
}

impl<S> Layer<S> for TracingBridge
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Self::severity_for(metadata.level());
        if !self.logger.is_enabled_for(&severity) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let call_site = CallSite::new(
            basename(metadata.file().unwrap_or_default()),
            metadata.module_path().unwrap_or_else(|| metadata.target()),
            metadata.line().unwrap_or(0),
        );
        self.logger
            .log_at(&severity, visitor.into_message(), call_site);
    }
}

/// Collects the `message` field plus any other fields as `name=value`.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        let mut message = self.message.unwrap_or_default();
        for field in self.fields {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(&field);
        }
        message
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

/// Installs the bridge as the global tracing subscriber.
///
/// `RUST_LOG` narrows what is forwarded; by default everything is, and the
/// logger's own thresholds decide.
pub fn capture_tracing(logger: Logger) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(filter)
        .with(TracingBridge::new(logger))
        .try_init()
}
