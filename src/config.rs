// src/config.rs

//! Layered configuration: built-in defaults, then `~/.config/logsift/config.toml`
//! (or an explicit `--config` file), then `LOGSIFT__SECTION__KEY` environment
//! variables.

use crate::classify::Extensions;
use crate::error::{LogsiftError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"
[storage]
# database = "/var/lib/logsift/logsift.db"

[uploads]
# root = "/var/lib/logsift/uploads"
direct_extensions  = ["txt", "csv"]
archive_extensions = ["zip", "rar", "7z"]

[archive]
unrar_program = "unrar"

[display]
preview_chars = 200
"#;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// `[storage]`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    pub database: Option<PathBuf>,
}

/// `[uploads]`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    pub root: Option<PathBuf>,
    #[serde(default = "default_direct_extensions")]
    pub direct_extensions: Vec<String>,
    #[serde(default = "default_archive_extensions")]
    pub archive_extensions: Vec<String>,
}

/// `[archive]`
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_unrar_program")]
    pub unrar_program: String,
}

/// `[display]`
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_direct_extensions() -> Vec<String> {
    Extensions::default().direct
}

fn default_archive_extensions() -> Vec<String> {
    Extensions::default().archive
}

fn default_unrar_program() -> String {
    "unrar".to_string()
}

fn default_preview_chars() -> usize {
    200
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            root: None,
            direct_extensions: default_direct_extensions(),
            archive_extensions: default_archive_extensions(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            unrar_program: default_unrar_program(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

impl Config {
    /// Loads the layered configuration. An explicit `path` must exist; the
    /// default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(config_path()?.as_path()).required(false),
        };

        let config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("LOGSIFT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.storage.database {
            Some(path) => Ok(path.clone()),
            None => Ok(base_dir()?.join("logsift.db")),
        }
    }

    pub fn upload_root(&self) -> Result<PathBuf> {
        match &self.uploads.root {
            Some(path) => Ok(path.clone()),
            None => Ok(base_dir()?.join("uploads")),
        }
    }

    pub fn extensions(&self) -> Extensions {
        Extensions::new(&self.uploads.direct_extensions, &self.uploads.archive_extensions)
    }
}

/// `~/.config/logsift`
fn base_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(LogsiftError::HomeDirNotFound)?;
    Ok(home_dir.join(".config/logsift"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}
