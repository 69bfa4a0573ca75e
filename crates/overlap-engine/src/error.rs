//! Error types for overlap-engine operations.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A calendar or export file could not be opened, read, or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ICS source was not well-formed.
    /// Includes the 1-based (unfolded) line number where the error was detected.
    #[error("ICS parse error at line {line}: {message}")]
    IcsParse { line: usize, message: String },

    /// A ranking CSV row could not be read back.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid merge policy: {0} (expected 'accumulate', 'overwrite' or 'distinct')")]
    InvalidPolicy(String),

    /// Only raised when strict validation is enabled.
    #[error("Event {index} of calendar {calendar} ends before it starts")]
    InvertedEvent { calendar: usize, index: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}
