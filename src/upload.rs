// src/upload.rs

use crate::classify::FileKind;
use crate::context::Context;
use crate::error::{LogsiftError, Result};
use crate::ingest::ingest;
use crate::models::Log;
use chrono::Local;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// An archive member that could not be stored.
#[derive(Debug)]
pub struct MemberFailure {
    pub path: PathBuf,
    pub error: LogsiftError,
}

/// Outcome of one accepted upload.
#[derive(Debug)]
pub struct UploadReport {
    /// Staged name: timestamp prefix plus the sanitized original name.
    pub filename: String,
    pub kind: FileKind,
    pub logs: Vec<Log>,
    pub failures: Vec<MemberFailure>,
}

/// Reduces an untrusted filename to a safe single path component.
///
/// The extension survives on its own: when nothing of the stem is left,
/// `upload` stands in for it.
pub fn secure_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    let stem = clean_component(stem);
    let stem = stem.trim_start_matches(['.', '_']);
    match ext.map(clean_component).filter(|e| !e.is_empty()) {
        Some(ext) if stem.is_empty() => format!("upload.{}", ext),
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    }
}

fn clean_component(part: &str) -> String {
    part.chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect()
}

/// Writes an upload's bytes to `<upload_root>/<YYYYMMDDHHMMSS>_<name>`.
pub fn stage<R: Read>(ctx: &Context, filename: &str, reader: &mut R) -> Result<(String, PathBuf)> {
    let safe = secure_filename(filename);
    if safe.is_empty() {
        return Err(LogsiftError::validation("Invalid file name"));
    }

    let staged_name = format!("{}_{}", Local::now().format("%Y%m%d%H%M%S"), safe);
    let staged_path = ctx.upload_root.join(&staged_name);
    let mut file = File::create(&staged_path)?;
    let bytes = io::copy(reader, &mut file)?;
    tracing::debug!(path = %staged_path.display(), bytes, "upload staged");
    Ok((staged_name, staged_path))
}

/// Removes a staged file whose contents are already stored. A failure is
/// only logged; it must not undo a successful ingestion.
fn discard_staged(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "staged archive not removed");
            false
        }
    }
}

/// Classifies, stages and ingests one uploaded file.
///
/// A direct log becomes one record. An archive is expanded and each
/// regular file inside becomes one record; a member that fails to ingest is
/// reported without stopping the rest, and the staged archive is removed
/// once expansion succeeded. A failed expansion ingests nothing.
pub fn upload<R: Read>(ctx: &Context, filename: &str, reader: &mut R) -> Result<UploadReport> {
    if filename.is_empty() {
        return Err(LogsiftError::validation("No selected file"));
    }

    let kind = ctx.extensions.classify(filename);
    if kind == FileKind::Rejected {
        tracing::warn!(actor = ctx.actor(), filename, "upload rejected");
        return Err(LogsiftError::validation("Invalid file extension"));
    }

    let (staged_name, staged_path) = stage(ctx, filename, reader)?;
    let mut report = UploadReport {
        filename: staged_name,
        kind,
        logs: Vec::new(),
        failures: Vec::new(),
    };

    if kind == FileKind::DirectLog {
        report.logs.push(ingest(&ctx.store, &staged_path)?);
    } else {
        let entries = ctx.expander().expand(&staged_path, &report.filename)?;
        for entry in entries {
            if !entry.is_file() {
                tracing::debug!(path = %entry.display(), "skipping non-file archive entry");
                continue;
            }
            match ingest(&ctx.store, &entry) {
                Ok(log) => report.logs.push(log),
                Err(error) => {
                    tracing::warn!(path = %entry.display(), %error, "archive member not ingested");
                    report.failures.push(MemberFailure { path: entry, error });
                }
            }
        }
        discard_staged(&staged_path);
    }

    tracing::info!(
        actor = ctx.actor(),
        filename = %report.filename,
        kind = ?report.kind,
        logs = report.logs.len(),
        failures = report.failures.len(),
        "upload processed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_filename_strips_paths_and_odd_characters() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\logs\\My Log (1).txt"), "My_Log_1.txt");
        assert_eq!(secure_filename("...hidden.txt"), "hidden.txt");
        assert_eq!(secure_filename("ünïcode.csv"), "ncode.csv");
        assert_eq!(secure_filename("///"), "");
    }

    #[test]
    fn secure_filename_keeps_extension_of_non_ascii_names() {
        assert_eq!(secure_filename("журнал.zip"), "upload.zip");
        assert_eq!(secure_filename("日志 2024.txt"), "2024.txt");
        assert_eq!(secure_filename("журнал"), "");
    }

    #[test]
    fn discarding_a_vanished_staged_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("20240101000000_gone.zip");
        assert!(!discard_staged(&staged));

        fs::write(&staged, b"PK").unwrap();
        assert!(discard_staged(&staged));
        assert!(!staged.exists());
    }
}
