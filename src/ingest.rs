// src/ingest.rs

use crate::db::Store;
use crate::error::{LogsiftError, Result};
use crate::models::{Log, NewLog};
use std::path::Path;

/// Reads `path` as UTF-8 and stores it as one log.
///
/// The whole file is read before anything is written, so a failed read
/// never leaves a partial record behind.
pub fn ingest(store: &Store, path: &Path) -> Result<Log> {
    let content = std::fs::read_to_string(path).map_err(|source| LogsiftError::ReadLog {
        path: path.to_path_buf(),
        source,
    })?;

    let log = NewLog::new(content, path.to_string_lossy())?;
    let id = store.insert(&log)?;
    tracing::info!(id, path = %path.display(), bytes = log.content.len(), "log ingested");

    store.get(id)
}
