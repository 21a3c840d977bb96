//! Main logger implementation
//!
//! A `Logger` owns the level threshold, the formatter and a single sink.
//! Every call is synchronous: gate on the threshold, attribute the caller,
//! render one line, write it under the sink lock, then run the level's
//! post-write action.

use super::{
    appender::Appender,
    caller::{self, CallerInfo},
    error::{LoggerError, Result},
    formatter::TextFormatter,
    log_context::{Fields, LogContext},
    log_entry::LogEntry,
    log_level::{LogLevel, PostWriteAction},
    metrics::LoggerMetrics,
    timestamp::TimestampFormat,
};
use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

/// Qualified-name prefixes of the frames that belong to the logger itself.
pub(crate) const CALLER_BOUNDARY: &[&str] = &[
    concat!(module_path!(), "::"),
    crate::global::CALLER_BOUNDARY,
];

/// Invoked with the exit status after a `Fatal` line has been written.
///
/// The default handler calls [`std::process::exit`]. A handler that returns
/// lets the logging call return normally.
pub type FatalHandler = Arc<dyn Fn(i32) + Send + Sync>;

pub struct Logger {
    min_level: RwLock<LogLevel>,
    appender: Mutex<Box<dyn Appender>>,
    formatter: TextFormatter,
    report_caller: bool,
    metrics: LoggerMetrics,
    on_fatal: FatalHandler,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.level())
            .field("appender", &self.appender.lock().name())
            .field("formatter", &self.formatter)
            .field("report_caller", &self.report_caller)
            .finish()
    }
}

fn exit_process() -> FatalHandler {
    Arc::new(|code: i32| std::process::exit(code))
}

impl Logger {
    /// Logger writing to standard output at `Debug` threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(
            LogLevel::Debug,
            Box::new(ConsoleAppender::new()),
            TextFormatter::default(),
            true,
            exit_process(),
        )
    }

    fn from_parts(
        level: LogLevel,
        appender: Box<dyn Appender>,
        formatter: TextFormatter,
        report_caller: bool,
        on_fatal: FatalHandler,
    ) -> Self {
        Self {
            min_level: RwLock::new(level),
            appender: Mutex::new(appender),
            formatter,
            report_caller,
            metrics: LoggerMetrics::new(),
            on_fatal,
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use shlog::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Info)
    ///     .max_message_length(120)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.level(), LogLevel::Info);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Set the threshold from one of the names `TRACE` .. `PANIC`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidLevel`] and leaves the threshold
    /// unchanged if `name` is not an exact, upper-case level name.
    pub fn set_level_name(&self, name: &str) -> Result<()> {
        let level = LogLevel::from_name(name).ok_or_else(|| LoggerError::invalid_level(name))?;
        self.set_level(level);
        Ok(())
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    /// Replace the sink. The previous sink is flushed and returned.
    pub fn set_appender(&self, appender: Box<dyn Appender>) -> Box<dyn Appender> {
        let mut previous = std::mem::replace(&mut *self.appender.lock(), appender);
        if let Err(e) = previous.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush replaced appender: {}", e);
        }
        previous
    }

    pub fn formatter(&self) -> &TextFormatter {
        &self.formatter
    }

    /// Get the logger metrics
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.lock().flush()
    }

    /// Log a message.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the line could not be written.
    ///
    /// # Panics
    ///
    /// At [`LogLevel::Panic`] this panics with the message after writing it.
    /// At [`LogLevel::Fatal`] the fatal handler runs, which by default exits
    /// the process with status 1.
    #[inline(never)]
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) -> Result<()> {
        self.dispatch(level, &message, None, Location::caller())
    }

    /// Log pre-formatted arguments, as produced by `format_args!`.
    #[inline(never)]
    #[track_caller]
    pub fn log_args(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<()> {
        self.dispatch(level, &args, None, Location::caller())
    }

    /// Log a message with every member of `record` attached as a field.
    ///
    /// `record` may be a value or any pointer to one (`&T`, `Box<T>`,
    /// `Arc<T>`). Its fields are only collected if the line is emitted.
    #[inline(never)]
    #[track_caller]
    pub fn log_fields(
        &self,
        level: LogLevel,
        message: impl fmt::Display,
        record: impl Fields,
    ) -> Result<()> {
        self.dispatch(level, &message, Some(&record), Location::caller())
    }

    /// Log with structured context fields
    #[inline(never)]
    #[track_caller]
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl fmt::Display,
        context: LogContext,
    ) -> Result<()> {
        self.dispatch(level, &message, Some(&context), Location::caller())
    }

    #[inline(never)]
    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display) -> Result<()> {
        self.dispatch(LogLevel::Trace, &message, None, Location::caller())
    }

    #[inline(never)]
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) -> Result<()> {
        self.dispatch(LogLevel::Debug, &message, None, Location::caller())
    }

    #[inline(never)]
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) -> Result<()> {
        self.dispatch(LogLevel::Info, &message, None, Location::caller())
    }

    #[inline(never)]
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) -> Result<()> {
        self.dispatch(LogLevel::Warn, &message, None, Location::caller())
    }

    #[inline(never)]
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) -> Result<()> {
        self.dispatch(LogLevel::Error, &message, None, Location::caller())
    }

    #[inline(never)]
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> Result<()> {
        self.dispatch(LogLevel::Fatal, &message, None, Location::caller())
    }

    #[inline(never)]
    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display) -> Result<()> {
        self.dispatch(LogLevel::Panic, &message, None, Location::caller())
    }

    /// Shared write path for every public entry point.
    #[inline(never)]
    fn dispatch(
        &self,
        level: LogLevel,
        message: &dyn fmt::Display,
        fields: Option<&dyn Fields>,
        location: &'static Location<'static>,
    ) -> Result<()> {
        let mut rendered = None;

        let written = if self.is_enabled(level) {
            let caller = if self.report_caller {
                caller::current_caller(CALLER_BOUNDARY, location)
            } else {
                CallerInfo::unknown()
            };
            let mut entry = LogEntry::new(level, message.to_string()).with_caller(caller);
            if let Some(fields) = fields {
                entry = entry.with_context(fields.fields());
            }
            let result = self.write_entry(&entry);
            rendered = Some(entry.message);
            result
        } else {
            self.metrics.record_suppressed();
            Ok(())
        };

        match level.post_write_action() {
            PostWriteAction::Continue => {}
            PostWriteAction::Exit(code) => {
                let _ = self.flush();
                (self.on_fatal)(code);
            }
            PostWriteAction::Unwind => {
                let _ = self.flush();
                let message = rendered.unwrap_or_else(|| message.to_string());
                panic!("{}", message);
            }
        }

        written
    }

    fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        let line = self.formatter.format(entry);
        let result = self.appender.lock().append(&line);
        match result {
            Ok(()) => {
                self.metrics.record_logged();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_write_failure();
                Err(e)
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.appender.get_mut().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Without an explicit appender or file the logger writes to standard output.
///
/// # Example
/// ```no_run
/// use shlog::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .file("/var/log/app.log")
///     .rotation_policy(RotationPolicy::new().with_max_backups(5))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    appender: Option<Box<dyn Appender>>,
    file: Option<PathBuf>,
    rotation: RotationPolicy,
    formatter: TextFormatter,
    report_caller: bool,
    on_fatal: Option<FatalHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Debug,
            appender: None,
            file: None,
            rotation: RotationPolicy::default(),
            formatter: TextFormatter::default(),
            report_caller: true,
            on_fatal: None,
        }
    }

    /// Set the level threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Use a custom sink. Takes precedence over [`file`](Self::file).
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Write to a rotating file at `path`.
    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotation_policy(mut self, policy: RotationPolicy) -> Self {
        self.rotation = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.formatter.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_message_length(mut self, max: usize) -> Self {
        self.formatter.max_message_length = max;
        self
    }

    /// Whether to walk the stack for the caller labels. When off, every
    /// line carries `[unknown][unknown]`.
    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fatal_handler(mut self, handler: FatalHandler) -> Self {
        self.on_fatal = Some(handler);
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Returns an error if the rotating file cannot be opened or the
    /// rotation policy is invalid.
    pub fn build(self) -> Result<Logger> {
        let appender: Box<dyn Appender> = match (self.appender, self.file) {
            (Some(appender), _) => appender,
            (None, Some(path)) => Box::new(RotatingFileAppender::with_policy(path, self.rotation)?),
            (None, None) => Box::new(ConsoleAppender::new()),
        };

        Ok(Logger::from_parts(
            self.level,
            appender,
            self.formatter,
            self.report_caller,
            self.on_fatal.unwrap_or_else(exit_process),
        ))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{SharedBuffer, WriterAppender};
    use std::sync::atomic::{AtomicI32, Ordering};

    fn buffered(level: LogLevel) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .level(level)
            .appender(WriterAppender::new(buffer.clone()))
            .report_caller(false)
            .fatal_handler(Arc::new(|_| {}))
            .build()
            .unwrap();
        (logger, buffer)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build().unwrap();
        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(logger.formatter(), &TextFormatter::default());
    }

    #[test]
    fn test_level_gate() {
        let (logger, buffer) = buffered(LogLevel::Warn);

        logger.info("hidden").unwrap();
        logger.warn("shown").unwrap();

        let out = buffer.contents();
        assert!(!out.contains("hidden"));
        assert!(out.contains("shown"));
        assert_eq!(logger.metrics().suppressed_count(), 1);
        assert_eq!(logger.metrics().total_logged(), 1);
    }

    #[test]
    fn test_set_level_name_rejects_unknown() {
        let (logger, _) = buffered(LogLevel::Error);
        assert!(logger.set_level_name("BOGUS").is_err());
        assert!(logger.set_level_name("debug").is_err());
        assert_eq!(logger.level(), LogLevel::Error);

        logger.set_level_name("TRACE").unwrap();
        assert_eq!(logger.level(), LogLevel::Trace);
    }

    #[test]
    fn test_log_args() {
        let (logger, buffer) = buffered(LogLevel::Trace);
        logger
            .log_args(LogLevel::Debug, format_args!("{} + {} = {}", 1, 2, 3))
            .unwrap();
        assert!(buffer.contents().contains(" 1 + 2 = 3\n"));
    }

    #[test]
    fn test_fields_not_collected_when_suppressed() {
        struct Counting<'a>(&'a AtomicI32);
        impl Fields for Counting<'_> {
            fn fields(&self) -> LogContext {
                self.0.fetch_add(1, Ordering::SeqCst);
                LogContext::new()
            }
        }

        let calls = AtomicI32::new(0);
        let (logger, _) = buffered(LogLevel::Error);
        logger.log_fields(LogLevel::Info, "skip", Counting(&calls)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        logger.log_fields(LogLevel::Error, "keep", Counting(&calls)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fatal_runs_handler_with_status_one() {
        let status = Arc::new(AtomicI32::new(0));
        let seen = Arc::clone(&status);
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .appender(WriterAppender::new(buffer.clone()))
            .fatal_handler(Arc::new(move |code| seen.store(code, Ordering::SeqCst)))
            .build()
            .unwrap();

        logger.fatal("cannot continue").unwrap();

        assert_eq!(status.load(Ordering::SeqCst), 1);
        assert!(buffer.contents().contains("FATAL"));
    }

    #[test]
    fn test_fatal_handler_runs_even_when_gated() {
        let status = Arc::new(AtomicI32::new(0));
        let seen = Arc::clone(&status);
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .level(LogLevel::Panic)
            .appender(WriterAppender::new(buffer.clone()))
            .fatal_handler(Arc::new(move |code| seen.store(code, Ordering::SeqCst)))
            .build()
            .unwrap();

        logger.fatal("gated").unwrap();

        assert!(buffer.is_empty());
        assert_eq!(status.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_unwinds_after_write() {
        let (logger, buffer) = buffered(LogLevel::Trace);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = logger.panic("invariant broken");
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("invariant broken"));
        assert!(buffer.contents().contains("invariant broken"));

        // The logger stays usable after the unwind
        logger.info("still alive").unwrap();
        assert!(buffer.contents().contains("still alive"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct Failing;
        impl Appender for Failing {
            fn append(&mut self, _: &str) -> Result<()> {
                Err(LoggerError::writer("sink offline"))
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "failing"
            }
        }

        let logger = Logger::builder().appender(Failing).build().unwrap();
        assert!(logger.error("lost").is_err());
        assert_eq!(logger.metrics().write_failures(), 1);
    }

    #[test]
    fn test_set_appender_swaps_sink() {
        let (logger, first) = buffered(LogLevel::Info);
        let second = SharedBuffer::new();

        logger.info("one").unwrap();
        let previous = logger.set_appender(Box::new(WriterAppender::new(second.clone())));
        logger.info("two").unwrap();

        assert_eq!(previous.name(), "writer");
        assert!(first.contents().contains("one") && !first.contents().contains("two"));
        assert!(second.contents().contains("two"));
    }
}
