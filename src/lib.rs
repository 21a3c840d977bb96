//! # shlog
//!
//! Shared structured logging for services.
//!
//! Every line carries a timestamp, a colored level tag, the directory and
//! function of the code that logged it, the message, and optional
//! `key=value` fields:
//!
//! ```text
//! 2025-01-08 10:30:45 [INFO][handlers][login] user signed in email=kim@example.com
//! ```
//!
//! ## Features
//!
//! - **Seven levels**: `TRACE` to `PANIC`, with a runtime threshold
//! - **Caller attribution**: the first frame above the logger is named on each line
//! - **Rotating files**: size-bounded segments, optional retention and gzip
//! - **Structured fields**: any type implementing [`Fields`], or declared with [`loggable!`]
//! - **Process-wide logger**: [`init_logger`], [`log`](global::log) and [`logf!`]
//!
//! ## Quick start
//!
//! ```no_run
//! use shlog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .level(LogLevel::Info)
//!     .file("logs/app.log")
//!     .build()
//!     .unwrap();
//!
//! logger.info("service started").unwrap();
//! ```

#[macro_use]
pub mod macros;

pub mod appenders;
pub mod core;
pub mod global;
pub mod validators;

pub mod prelude {
    pub use crate::appenders::{
        ConsoleAppender, RotatingFileAppender, RotationPolicy, SharedBuffer, WriterAppender,
    };
    pub use crate::core::{
        Appender, FieldValue, Fields, LogContext, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, Result, TimestampFormat, ToFieldValue,
    };
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    Appender, CallerInfo, FatalHandler, FieldValue, Fields, LogContext, LogEntry, LogLevel,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result, TextFormatter,
    TimestampFormat, ToFieldValue,
};
pub use global::{
    change_log_level, global, init_logger, init_with, is_initialized, log, log_args, log_fields,
    shutdown,
};
