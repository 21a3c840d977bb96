//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod config;
pub mod error;
pub mod formatter;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use appender::Appender;
pub use caller::CallerInfo;
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use formatter::{TextFormatter, DEFAULT_MAX_MESSAGE_LENGTH};
pub use log_context::{FieldValue, Fields, LogContext, ToFieldValue};
pub use log_entry::LogEntry;
pub use log_level::{LogLevel, PostWriteAction};
pub use logger::{FatalHandler, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use timestamp::{TimestampFormat, DEFAULT_TIMESTAMP_PATTERN};
