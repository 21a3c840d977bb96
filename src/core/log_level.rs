//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Panic = 6,
}

/// What the logger does after a line at a given level has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostWriteAction {
    /// Return to the caller.
    Continue,
    /// Terminate the process with the given status.
    Exit(i32),
    /// Unwind the calling thread with a panic.
    Unwind,
}

impl LogLevel {
    /// Every level in rank order.
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Panic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Panic => "PANIC",
        }
    }

    /// Parse one of the seven canonical names. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            "FATAL" => Some(LogLevel::Fatal),
            "PANIC" => Some(LogLevel::Panic),
            _ => None,
        }
    }

    /// Lenient parse used by emission calls: anything unrecognized is `Info`.
    pub fn from_name_or_info(name: &str) -> Self {
        Self::from_name(name).unwrap_or(LogLevel::Info)
    }

    pub fn color(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace | LogLevel::Debug => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => Red,
            LogLevel::Info => Cyan,
        }
    }

    pub fn post_write_action(&self) -> PostWriteAction {
        match self {
            LogLevel::Fatal => PostWriteAction::Exit(1),
            LogLevel::Panic => PostWriteAction::Unwind,
            _ => PostWriteAction::Continue,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| LoggerError::invalid_level(s))
    }
}
