//! Logging macros for ergonomic log message formatting.
//!
//! The leveled macros take a logger and a `format!`-style message. The
//! message is only rendered if the level passes the logger's threshold.
//!
//! # Examples
//!
//! ```
//! use shlog::prelude::*;
//! use shlog::info;
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// Evaluates to the `Result` of the logging call.
///
/// ```
/// # use shlog::prelude::*;
/// # let logger = Logger::new();
/// use shlog::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_args($level, format_args!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use shlog::prelude::*;
/// # let logger = Logger::new();
/// use shlog::error;
/// let code = 404;
/// error!(logger, "Request failed with status {}", code).unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. The logger's fatal handler runs afterwards.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Format a message and log it through the global logger.
///
/// The level is given by name (`"INFO"`, `"ERROR"`, ...). Unknown names log
/// at `INFO`.
///
/// ```
/// use shlog::logf;
///
/// shlog::init_with(shlog::Logger::new());
/// logf!("INFO", "user {} signed in from {}", 42, "10.0.0.7");
/// ```
#[macro_export]
macro_rules! logf {
    ($level:expr, $($arg:tt)+) => {
        $crate::global::log_args($level, format_args!($($arg)+))
    };
}

/// Declare a struct whose members are all logged as fields.
///
/// Each member becomes one field keyed by its name. Member types must
/// implement [`ToFieldValue`](crate::ToFieldValue).
///
/// ```
/// use shlog::{loggable, Fields};
///
/// loggable! {
///     #[derive(Debug, Clone)]
///     pub struct Session {
///         pub user: String,
///         pub attempts: u32,
///     }
/// }
///
/// let session = Session { user: "kim".into(), attempts: 2 };
/// let fields = session.fields();
/// assert_eq!(fields.get("user").unwrap().to_string(), "kim");
/// assert_eq!(fields.get("attempts").unwrap().to_string(), "2");
/// ```
#[macro_export]
macro_rules! loggable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Fields for $name {
            fn fields(&self) -> $crate::LogContext {
                let mut context = $crate::LogContext::new();
                $(
                    context.add_field(
                        stringify!($field),
                        $crate::ToFieldValue::to_field_value(&self.$field),
                    );
                )*
                context
            }
        }
    };
}
