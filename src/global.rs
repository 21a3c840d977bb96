//! Process-wide logger
//!
//! A single [`Logger`] can be installed for the whole process and reached
//! through the free functions in this module. Levels are named by their
//! upper-case labels. Emission through an unknown name logs at `INFO`.
//!
//! ```no_run
//! shlog::init_logger("logs/server.log").unwrap();
//! shlog::log("INFO", "listening on :8080");
//! shlog::change_log_level("WARN").unwrap();
//! ```

use crate::core::{Fields, LogLevel, Logger, LoggerConfig, LoggerError, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Qualified-name prefix of this module's frames.
pub(crate) const CALLER_BOUNDARY: &str = concat!(module_path!(), "::");

const UNINITIALIZED: &str = "shlog: logger used before init_logger";

static LOGGER: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);

/// Install the process-wide logger.
///
/// An empty `path` logs to standard output. Otherwise lines go to a rotating
/// file at `path` with the default 1 MiB segment size. The threshold starts
/// at `DEBUG`. Calling this again replaces the current logger.
///
/// On re-initialization the current logger is flushed before the new file is
/// opened, and it stays installed until the new one is ready, so concurrent
/// callers never observe an uninitialized logger. See [`init_with`] for calls
/// still in flight on the old logger.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or opened. The current
/// logger is left in place in that case.
pub fn init_logger(path: &str) -> Result<()> {
    if let Some(current) = global() {
        report(current.flush());
    }
    let config = if path.is_empty() {
        LoggerConfig::default()
    } else {
        LoggerConfig::for_path(path)
    };
    init_with(config.build()?);
    Ok(())
}

/// Install a custom-built logger as the process-wide logger.
///
/// The previous logger is flushed and released. A call that fetched it before
/// the swap finishes its line on the previous sink. If both loggers write the
/// same file and the new one rotates first, that last line lands in the
/// rotated backup rather than the active file. It is never lost or split.
pub fn init_with(logger: Logger) {
    let previous = LOGGER.write().replace(Arc::new(logger));
    if let Some(previous) = previous {
        report(previous.flush());
    }
}

/// Flush and remove the process-wide logger.
pub fn shutdown() {
    let previous = LOGGER.write().take();
    if let Some(previous) = previous {
        report(previous.flush());
    }
}

pub fn is_initialized() -> bool {
    LOGGER.read().is_some()
}

/// The installed logger, if any.
pub fn global() -> Option<Arc<Logger>> {
    LOGGER.read().clone()
}

#[track_caller]
fn installed() -> Arc<Logger> {
    match global() {
        Some(logger) => logger,
        None => panic!("{}", UNINITIALIZED),
    }
}

fn report(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("[LOGGER ERROR] {}", e);
    }
}

/// Change the threshold of the process-wide logger.
///
/// # Errors
///
/// Returns [`LoggerError::InvalidLevel`] for a name outside `TRACE` ..
/// `PANIC`, leaving the threshold unchanged, and
/// [`LoggerError::NotInitialized`] if no logger is installed.
pub fn change_log_level(name: &str) -> Result<()> {
    let logger = global().ok_or(LoggerError::NotInitialized)?;
    logger.set_level_name(name).map_err(|e| {
        eprintln!(
            "[LOGGER WARNING] Unknown log level {:?}, keeping {}",
            name,
            logger.level()
        );
        e
    })
}

/// Log `message` at the named level.
///
/// # Panics
///
/// Panics if no logger is installed, and at level `PANIC` after the line is
/// written.
#[inline(never)]
#[track_caller]
pub fn log(level: &str, message: impl fmt::Display) {
    let logger = installed();
    report(logger.log(LogLevel::from_name_or_info(level), message));
}

/// Log pre-formatted arguments at the named level. See [`logf!`](crate::logf).
#[inline(never)]
#[track_caller]
pub fn log_args(level: &str, args: fmt::Arguments<'_>) {
    let logger = installed();
    report(logger.log_args(LogLevel::from_name_or_info(level), args));
}

/// Log `message` with every member of `record` attached as a field.
#[inline(never)]
#[track_caller]
pub fn log_fields(level: &str, message: impl fmt::Display, record: impl Fields) {
    let logger = installed();
    report(logger.log_fields(LogLevel::from_name_or_info(level), message, record));
}
