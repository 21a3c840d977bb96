//! Tests for the process-wide logger
//!
//! The global slot is shared by every test in this binary, so each test
//! takes `SERIAL` before touching it.

use parking_lot::Mutex;
use shlog::appenders::{SharedBuffer, WriterAppender};
use shlog::{logf, LogLevel, Logger, LoggerError};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

static SERIAL: Mutex<()> = parking_lot::const_mutex(());

fn install(level: LogLevel) -> SharedBuffer {
    let buffer = SharedBuffer::new();
    shlog::init_with(
        Logger::builder()
            .level(level)
            .appender(WriterAppender::new(buffer.clone()))
            .fatal_handler(Arc::new(|_| {}))
            .build()
            .unwrap(),
    );
    buffer
}

#[test]
fn test_global_log_by_name() {
    let _guard = SERIAL.lock();
    let buffer = install(LogLevel::Debug);

    shlog::log("WARN", "disk almost full");
    shlog::log("TRACE", "hidden");

    let content = buffer.contents();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("WARN"));
    assert!(content.contains("disk almost full"));
}

#[test]
fn test_unknown_emission_level_is_info() {
    let _guard = SERIAL.lock();
    let buffer = install(LogLevel::Debug);

    shlog::log("NOTICE", "mapped");
    assert!(buffer.contents().contains("[\x1b[36mINFO\x1b[0m]"));
}

#[test]
fn test_global_caller_attribution() {
    let _guard = SERIAL.lock();
    let buffer = install(LogLevel::Debug);

    shlog::log("INFO", "from the test");
    logf!("INFO", "formatted {}", 7);

    let content = buffer.contents();
    // Symbols name the function in debug builds. The directory always
    // comes from the call site.
    let expected = if cfg!(debug_assertions) {
        "[tests][test_global_caller_attribution]"
    } else {
        "[tests]["
    };
    for message in ["from the test", "formatted 7"] {
        let line = content.lines().find(|l| l.contains(message)).unwrap();
        assert!(line.contains(expected), "{line:?}");
    }
}

#[test]
fn test_change_log_level() {
    let _guard = SERIAL.lock();
    let buffer = install(LogLevel::Debug);

    shlog::change_log_level("ERROR").unwrap();
    shlog::log("INFO", "suppressed");

    let err = shlog::change_log_level("error").unwrap_err();
    assert!(matches!(err, LoggerError::InvalidLevel { .. }));
    assert_eq!(shlog::global().unwrap().level(), LogLevel::Error);

    shlog::log("ERROR", "shown");
    let content = buffer.contents();
    assert!(!content.contains("suppressed"));
    assert!(content.contains("shown"));
}

#[test]
fn test_global_log_fields() {
    let _guard = SERIAL.lock();
    let buffer = install(LogLevel::Debug);

    let context = shlog::LogContext::new().with_field("user", "kim");
    shlog::log_fields("DEBUG", "lookup", &context);

    assert!(buffer.contents().contains("user\x1b[0m=kim"));
}

#[test]
fn test_global_fatal_and_panic() {
    let _guard = SERIAL.lock();
    let buffer = install(LogLevel::Debug);

    shlog::log("FATAL", "handler swallows exit");
    let result = std::panic::catch_unwind(|| shlog::log("PANIC", "unwinding"));

    assert!(result.is_err());
    let content = buffer.contents();
    assert!(content.contains("FATAL"));
    assert!(content.contains("PANIC"));
}

#[test]
fn test_init_logger_with_file_and_shutdown() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("global.log");

    shlog::init_logger(log_file.to_str().unwrap()).unwrap();
    assert!(shlog::is_initialized());
    assert_eq!(shlog::global().unwrap().level(), LogLevel::Debug);

    shlog::log("DEBUG", "to file");
    shlog::shutdown();
    assert!(!shlog::is_initialized());
    assert!(matches!(
        shlog::change_log_level("INFO"),
        Err(LoggerError::NotInitialized)
    ));

    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.contains("to file"));
}

#[test]
fn test_reinit_same_file_keeps_every_line() {
    let _guard = SERIAL.lock();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("reinit.log");
    let path = log_file.to_str().unwrap();

    shlog::init_logger(path).unwrap();
    let held = shlog::global().unwrap();
    shlog::log("INFO", "first logger");

    shlog::init_logger(path).unwrap();
    shlog::log("INFO", "second logger");
    // A caller still holding the replaced logger appends to the same file
    held.info("late line on the old logger").unwrap();
    drop(held);
    shlog::shutdown();

    let content = fs::read_to_string(&log_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "{content:?}");
    assert!(lines[0].ends_with("first logger"));
    assert!(lines[1].ends_with("second logger"));
    assert!(lines[2].ends_with("late line on the old logger"));
}

#[test]
fn test_failed_reinit_keeps_current_logger() {
    let _guard = SERIAL.lock();
    let buffer = install(LogLevel::Debug);
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // A regular file where the log directory should be
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, b"").unwrap();

    let target = blocker.join("app.log");
    assert!(shlog::init_logger(target.to_str().unwrap()).is_err());

    shlog::log("INFO", "still routed");
    assert!(buffer.contents().contains("still routed"));
}
