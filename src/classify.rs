// src/classify.rs

use std::path::Path;

/// What an uploaded file is, judged only by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Rejected,
    DirectLog,
    Archive,
}

/// Allow-lists of lowercase extensions, without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    pub direct: Vec<String>,
    pub archive: Vec<String>,
}

impl Default for Extensions {
    fn default() -> Self {
        Extensions {
            direct: vec!["txt".to_string(), "csv".to_string()],
            archive: vec!["zip".to_string(), "rar".to_string(), "7z".to_string()],
        }
    }
}

impl Extensions {
    pub fn new<S: AsRef<str>>(direct: &[S], archive: &[S]) -> Self {
        let lower = |list: &[S]| -> Vec<String> {
            list.iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect()
        };
        Extensions {
            direct: lower(direct),
            archive: lower(archive),
        }
    }

    pub fn classify(&self, filename: &str) -> FileKind {
        let Some(ext) = extension(filename) else {
            return FileKind::Rejected;
        };
        if self.direct.iter().any(|e| *e == ext) {
            FileKind::DirectLog
        } else if self.archive.iter().any(|e| *e == ext) {
            FileKind::Archive
        } else {
            FileKind::Rejected
        }
    }
}

/// Classifies against the default allow-lists.
pub fn classify(filename: &str) -> FileKind {
    Extensions::default().classify(filename)
}

/// Lowercased text after the last `.`, if there is any.
pub fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// The name with its final extension removed.
pub fn base_name(filename: &str) -> &str {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
