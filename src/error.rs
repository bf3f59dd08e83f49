// src/error.rs

use crate::normalize::Bound;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogsiftError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database Error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Config Error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Home directory not found")]
    HomeDirNotFound,

    /// Rejected input: bad extension, empty filename, nothing to search.
    #[error("{0}")]
    Validation(String),

    #[error("Start date must be before End date.")]
    Range,

    #[error("Invalid {bound} date '{value}'. Use YYYY-MM-DDTHH:MM.")]
    Parse { bound: Bound, value: String },

    #[error("{} date must be before now.", .bound.label())]
    FutureDate { bound: Bound },

    #[error("Failed to extract archive {}: {reason}", .archive.display())]
    Archive { archive: PathBuf, reason: String },

    #[error("Failed to read log file {}: {source}", .path.display())]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Log ID {0} not found")]
    LogNotFound(i64),
}

impl LogsiftError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LogsiftError::Validation(msg.into())
    }

    /// Errors that are the user's to fix, as opposed to environment failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LogsiftError::Validation(_)
                | LogsiftError::Range
                | LogsiftError::Parse { .. }
                | LogsiftError::FutureDate { .. }
                | LogsiftError::LogNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LogsiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_date_message_names_the_bound() {
        let err = LogsiftError::FutureDate { bound: Bound::Start };
        assert_eq!(err.to_string(), "Start date must be before now.");
        let err = LogsiftError::FutureDate { bound: Bound::End };
        assert_eq!(err.to_string(), "End date must be before now.");
    }

    #[test]
    fn parse_message_names_the_bound() {
        let err = LogsiftError::Parse {
            bound: Bound::End,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid end date 'yesterday'. Use YYYY-MM-DDTHH:MM."
        );
    }

    #[test]
    fn user_errors_are_classified() {
        assert!(LogsiftError::validation("Invalid file extension").is_user_error());
        assert!(LogsiftError::Range.is_user_error());
        assert!(!LogsiftError::HomeDirNotFound.is_user_error());
    }
}
