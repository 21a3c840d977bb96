//! Serializable logger configuration

use super::{
    error::{LoggerError, Result},
    formatter::DEFAULT_MAX_MESSAGE_LENGTH,
    log_level::LogLevel,
    logger::{Logger, LoggerBuilder},
    timestamp::TimestampFormat,
};
use crate::appenders::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything needed to build a [`Logger`], loadable from JSON.
///
/// Missing keys take their defaults, so `{}` is a valid configuration that
/// logs to standard output at `DEBUG`.
///
/// ```
/// use shlog::core::LoggerConfig;
///
/// let config = LoggerConfig::from_json(r#"{
///     "level": "INFO",
///     "file": "logs/app.log",
///     "rotation": { "max_size": 4096, "max_backups": 3 }
/// }"#).unwrap();
///
/// assert_eq!(config.rotation.max_size, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    /// Rotating log file. Standard output when absent.
    pub file: Option<PathBuf>,
    pub timestamp_format: TimestampFormat,
    pub max_message_length: usize,
    pub report_caller: bool,
    pub rotation: RotationPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            file: None,
            timestamp_format: TimestampFormat::default(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            report_caller: true,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggerConfig {
    /// Default configuration writing to the file at `path`.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_message_length == 0 {
            return Err(LoggerError::config(
                "max_message_length",
                "must be greater than zero",
            ));
        }
        self.rotation.validate()
    }

    pub fn builder(&self) -> LoggerBuilder {
        let builder = Logger::builder()
            .level(self.level)
            .timestamp_format(self.timestamp_format.clone())
            .max_message_length(self.max_message_length)
            .report_caller(self.report_caller)
            .rotation_policy(self.rotation.clone());
        match &self.file {
            Some(path) => builder.file(path.clone()),
            None => builder,
        }
    }

    pub fn build(&self) -> Result<Logger> {
        self.validate()?;
        self.builder().build()
    }
}
