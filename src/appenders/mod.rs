//! Appender implementations

pub mod console;
pub mod rotating_file;
pub mod writer;

pub use console::{ConsoleAppender, ConsoleTarget};
pub use rotating_file::{RotatingFileAppender, RotationPolicy, DEFAULT_MAX_SIZE};
pub use writer::{SharedBuffer, WriterAppender};

pub use crate::core::Appender;
