//! Observability for the analyzer: `tracing` subscriber setup and log
//! redaction.

mod logging;

pub use logging::{redact, LogFormat, LogLevel, LoggingConfig};
