// src/models.rs

use crate::error::{LogsiftError, Result};
use chrono::NaiveDateTime;
use std::borrow::Cow;

/// Storage format for `logs.date`. Fixed width, so text order is time order.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One stored log: the full text of one ingested file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub id: i64,
    pub date: NaiveDateTime, // local time
    pub content: String,
    pub file_path: String,
}

impl Log {
    /// Content shortened to `max_chars` characters with a trailing `...`.
    pub fn preview(&self, max_chars: usize) -> Cow<'_, str> {
        match self.content.char_indices().nth(max_chars) {
            Some((cut, _)) => Cow::Owned(format!("{}...", &self.content[..cut])),
            None => Cow::Borrowed(&self.content),
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A log not yet written to the store.
#[derive(Debug, Clone)]
pub struct NewLog {
    pub date: Option<NaiveDateTime>,
    pub content: String,
    pub file_path: String,
}

impl NewLog {
    pub fn new(content: impl Into<String>, file_path: impl Into<String>) -> Result<Self> {
        let content = content.into();
        let file_path = file_path.into();
        if file_path.is_empty() {
            return Err(LogsiftError::validation("Log file path is empty"));
        }
        if content.is_empty() {
            return Err(LogsiftError::validation(format!(
                "Log file {} is empty",
                file_path
            )));
        }
        Ok(NewLog {
            date: None,
            content,
            file_path,
        })
    }

    /// Pins the timestamp instead of letting the store default it.
    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }
}
