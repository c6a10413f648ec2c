use std::sync::Arc;

use toolbox::internal::logger::formatter::DEFAULT_DATE_FORMAT;
use toolbox::internal::logger::level;
use toolbox::internal::logger::{
    CallSiteStrategy, ColorFormatter, LogSettings, Logging, MemoryWriter, Sink, StyleTable,
    TracingBridge,
};
use tracing_subscriber::layer::SubscriberExt;

#[cfg(test)]
mod tests {
    use super::*;

    fn bridged(template: &str) -> (Logging, MemoryWriter) {
        let logging = Logging::new(LogSettings {
            call_sites: CallSiteStrategy::TrackCaller,
            ..Default::default()
        });
        let writer = MemoryWriter::new();
        let root = logging.root();
        root.set_level(&level::DEBUG);
        root.add_sink(Arc::new(Sink::writer(
            "memory",
            writer.clone(),
            false,
            &level::DEBUG,
            ColorFormatter::new(template, DEFAULT_DATE_FORMAT, StyleTable::standard()).unwrap(),
        )));
        (logging, writer)
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(TracingBridge::severity_for(&tracing::Level::TRACE), level::DEBUG);
        assert_eq!(TracingBridge::severity_for(&tracing::Level::DEBUG), level::DEBUG);
        assert_eq!(TracingBridge::severity_for(&tracing::Level::INFO), level::INFO);
        assert_eq!(TracingBridge::severity_for(&tracing::Level::WARN), level::WARNING);
        assert_eq!(TracingBridge::severity_for(&tracing::Level::ERROR), level::ERROR);
    }

    #[test]
    fn test_events_reach_logger_sinks() {
        let (logging, writer) = bridged("%(levelname)s %(filename)s %(msg)s");
        let subscriber = tracing_subscriber::registry().with(TracingBridge::new(logging.root()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk almost full");
            tracing::info!(user = "ada", attempts = 3, "login");
        });

        assert_eq!(
            writer.lines(),
            vec![
                "WARNING bridge_tests.rs disk almost full",
                "INFO bridge_tests.rs login user=ada attempts=3",
            ]
        );
    }

    #[test]
    fn test_logger_threshold_applies_to_events() {
        let (logging, writer) = bridged("%(msg)s");
        logging.root().set_level(&level::ERROR);
        let subscriber = tracing_subscriber::registry().with(TracingBridge::new(logging.root()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("dropped");
            tracing::warn!("dropped too");
            tracing::error!("kept");
        });

        assert_eq!(writer.lines(), vec!["kept"]);
    }
}
