pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::config;
pub use internal::instrument::{FailurePolicy, Instrumentation, LogOwner};
pub use internal::logger::level;
pub use internal::logger::{Logger, Logging, SeverityLevel};
