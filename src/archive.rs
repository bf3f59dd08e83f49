// src/archive.rs

use crate::classify::{base_name, extension};
use crate::error::{LogsiftError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Rar,
    SevenZip,
}

impl ArchiveFormat {
    pub fn from_name(filename: &str) -> Option<Self> {
        match extension(filename)?.as_str() {
            "zip" => Some(ArchiveFormat::Zip),
            "rar" => Some(ArchiveFormat::Rar),
            "7z" => Some(ArchiveFormat::SevenZip),
            _ => None,
        }
    }
}

/// Extracts archives into per-archive directories under a scratch root.
///
/// Two archives whose names share a base name extract into the same
/// directory; concurrent expansions of those are not kept apart.
#[derive(Debug, Clone)]
pub struct ArchiveExpander {
    scratch_root: PathBuf,
    unrar_program: String,
}

impl ArchiveExpander {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        ArchiveExpander {
            scratch_root: scratch_root.into(),
            unrar_program: "unrar".to_string(),
        }
    }

    /// Program used for `.rar` archives (invoked as `<program> x -o+ -y <archive> <dir>/`).
    pub fn with_unrar_program(mut self, program: impl Into<String>) -> Self {
        self.unrar_program = program.into();
        self
    }

    pub fn output_dir(&self, archive_name: &str) -> PathBuf {
        self.scratch_root.join(base_name(archive_name))
    }

    /// Extracts `archive_path` and returns the top-level entries of the
    /// output directory, sorted. Nested directories show up as entries and
    /// are not descended into.
    pub fn expand(&self, archive_path: &Path, archive_name: &str) -> Result<Vec<PathBuf>> {
        let format = ArchiveFormat::from_name(archive_name).ok_or_else(|| {
            archive_error(archive_path, "unsupported archive format".to_string())
        })?;

        let out_dir = self.output_dir(archive_name);
        fs::create_dir_all(&out_dir)?;
        tracing::debug!(archive = %archive_path.display(), out_dir = %out_dir.display(), ?format, "expanding archive");

        match format {
            ArchiveFormat::Zip => extract_zip(archive_path, &out_dir)?,
            ArchiveFormat::SevenZip => extract_7z(archive_path, &out_dir)?,
            ArchiveFormat::Rar => self.extract_rar(archive_path, &out_dir)?,
        }

        let mut entries = fs::read_dir(&out_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        entries.sort();

        tracing::info!(archive = %archive_path.display(), entries = entries.len(), "archive expanded");
        Ok(entries)
    }

    fn extract_rar(&self, archive_path: &Path, out_dir: &Path) -> Result<()> {
        // unrar treats a destination with a trailing separator as a directory
        let mut dest = out_dir.as_os_str().to_owned();
        dest.push(std::path::MAIN_SEPARATOR_STR);

        let output = Command::new(&self.unrar_program)
            .args(["x", "-o+", "-y"])
            .arg(archive_path)
            .arg(&dest)
            .output()
            .map_err(|e| {
                archive_error(
                    archive_path,
                    format!("could not run '{}': {}", self.unrar_program, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(archive_error(
                archive_path,
                format!("{} exited with {}: {}", self.unrar_program, output.status, stderr.trim()),
            ));
        }
        Ok(())
    }
}

fn extract_zip(archive_path: &Path, out_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| archive_error(archive_path, e.to_string()))?;
    archive
        .extract(out_dir)
        .map_err(|e| archive_error(archive_path, e.to_string()))
}

fn extract_7z(archive_path: &Path, out_dir: &Path) -> Result<()> {
    let mut unsafe_member: Option<String> = None;
    sevenz_rust::decompress_file_with_extract_fn(archive_path, out_dir, |entry, reader, dest| {
        if !is_contained(entry.name()) {
            unsafe_member = Some(entry.name().to_string());
            return Ok(false);
        }
        sevenz_rust::default_entry_extract_fn(entry, reader, dest)
    })
    .map_err(|e| archive_error(archive_path, e.to_string()))?;

    match unsafe_member {
        Some(name) => Err(archive_error(
            archive_path,
            format!("member '{}' escapes the output directory", name),
        )),
        None => Ok(()),
    }
}

/// True when a member name stays below the directory it is extracted into.
fn is_contained(name: &str) -> bool {
    !name.starts_with(['/', '\\'])
        && !Path::new(name).is_absolute()
        && !name.split(['/', '\\']).any(|part| part == "..")
}

fn archive_error(archive: &Path, reason: String) -> LogsiftError {
    LogsiftError::Archive {
        archive: archive.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, members: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, body) in members {
            if name.ends_with('/') {
                writer
                    .add_directory(name.trim_end_matches('/'), SimpleFileOptions::default())
                    .unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(body.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn format_detection() {
        assert_eq!(ArchiveFormat::from_name("a.ZIP"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_name("a.rar"), Some(ArchiveFormat::Rar));
        assert_eq!(ArchiveFormat::from_name("a.7z"), Some(ArchiveFormat::SevenZip));
        assert_eq!(ArchiveFormat::from_name("a.tar"), None);
    }

    #[test]
    fn expands_zip_into_dir_named_after_archive() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("bundle.zip");
        write_zip(&archive, &[("a.txt", "first"), ("b.txt", "second")]);

        let expander = ArchiveExpander::new(scratch.path());
        let entries = expander.expand(&archive, "bundle.zip").unwrap();

        let out_dir = scratch.path().join("bundle");
        assert_eq!(entries, vec![out_dir.join("a.txt"), out_dir.join("b.txt")]);
        assert_eq!(fs::read_to_string(out_dir.join("b.txt")).unwrap(), "second");
    }

    #[test]
    fn listing_is_not_recursive() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("nested.zip");
        write_zip(&archive, &[("top.txt", "t"), ("inner/", ""), ("inner/deep.txt", "d")]);

        let entries = ArchiveExpander::new(scratch.path())
            .expand(&archive, "nested.zip")
            .unwrap();

        let out_dir = scratch.path().join("nested");
        assert_eq!(entries, vec![out_dir.join("inner"), out_dir.join("top.txt")]);
        assert!(entries[0].is_dir());
    }

    #[test]
    fn existing_output_dir_is_reused() {
        let scratch = tempfile::tempdir().unwrap();
        fs::create_dir(scratch.path().join("again")).unwrap();
        let archive = scratch.path().join("again.zip");
        write_zip(&archive, &[("a.txt", "x")]);

        let entries = ArchiveExpander::new(scratch.path())
            .expand(&archive, "again.zip")
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn corrupt_zip_is_an_archive_error() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("broken.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let err = ArchiveExpander::new(scratch.path())
            .expand(&archive, "broken.zip")
            .unwrap_err();
        assert!(matches!(err, LogsiftError::Archive { .. }));
    }

    fn write_7z(path: &Path, members: &[(&str, &str)]) {
        let staging = tempfile::tempdir().unwrap();
        let mut writer = sevenz_rust::SevenZWriter::create(path).unwrap();
        for (i, (name, body)) in members.iter().enumerate() {
            let source = staging.path().join(format!("member{}", i));
            fs::write(&source, body).unwrap();
            let entry = sevenz_rust::SevenZArchiveEntry::from_path(&source, name.to_string());
            writer
                .push_archive_entry(entry, Some(File::open(&source).unwrap()))
                .unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn member_containment() {
        assert!(is_contained("a.txt"));
        assert!(is_contained("dir/b.txt"));
        assert!(is_contained("..notes.txt"));
        assert!(!is_contained("../escaped.txt"));
        assert!(!is_contained("dir/../../escaped.txt"));
        assert!(!is_contained("..\\escaped.txt"));
        assert!(!is_contained("/etc/passwd"));
        assert!(is_contained("12:00.log"));
    }

    #[test]
    fn expands_7z_archive() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("week.7z");
        write_7z(&archive, &[("mon.txt", "monday\n"), ("tue.txt", "tuesday\n")]);

        let entries = ArchiveExpander::new(scratch.path())
            .expand(&archive, "week.7z")
            .unwrap();

        let out_dir = scratch.path().join("week");
        assert_eq!(entries, vec![out_dir.join("mon.txt"), out_dir.join("tue.txt")]);
        assert_eq!(fs::read_to_string(out_dir.join("tue.txt")).unwrap(), "tuesday\n");
    }

    #[test]
    fn seven_zip_member_cannot_escape_output_dir() {
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join("uploads");
        fs::create_dir(&scratch).unwrap();
        let archive = scratch.join("evil.7z");
        write_7z(&archive, &[("../../escaped.txt", "gotcha")]);

        let err = ArchiveExpander::new(&scratch)
            .expand(&archive, "evil.7z")
            .unwrap_err();

        assert!(matches!(err, LogsiftError::Archive { .. }));
        assert!(!root.path().join("escaped.txt").exists());
        assert!(!scratch.join("escaped.txt").exists());
    }

    #[test]
    fn corrupt_7z_is_an_archive_error() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("broken.7z");
        fs::write(&archive, b"not seven zip either").unwrap();

        let err = ArchiveExpander::new(scratch.path())
            .expand(&archive, "broken.7z")
            .unwrap_err();
        assert!(matches!(err, LogsiftError::Archive { .. }));
    }

    #[test]
    fn missing_rar_tool_is_an_archive_error() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("logs.rar");
        fs::write(&archive, b"Rar!").unwrap();

        let err = ArchiveExpander::new(scratch.path())
            .with_unrar_program("logsift-no-such-unrar")
            .expand(&archive, "logs.rar")
            .unwrap_err();
        assert!(matches!(err, LogsiftError::Archive { .. }));
    }

    #[test]
    fn unsupported_extension_is_an_archive_error() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("logs.tar");
        fs::write(&archive, b"tar").unwrap();

        let err = ArchiveExpander::new(scratch.path())
            .expand(&archive, "logs.tar")
            .unwrap_err();
        assert!(matches!(err, LogsiftError::Archive { .. }));
        assert!(!scratch.path().join("logs").exists());
    }
}
