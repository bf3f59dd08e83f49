// src/context.rs

use crate::archive::ArchiveExpander;
use crate::classify::Extensions;
use crate::config::Config;
use crate::db::Store;
use crate::error::Result;
use std::path::PathBuf;

/// Everything the ingestion and search pipeline needs, passed explicitly.
pub struct Context {
    pub store: Store,
    pub upload_root: PathBuf,
    pub extensions: Extensions,
    pub unrar_program: String,
    /// Acting user, recorded in log events only.
    pub actor: Option<String>,
}

impl Context {
    /// Opens the configured store and makes sure the upload root exists.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Store::open(&config.database_path()?)?;
        let mut ctx = Context::new(store, config.upload_root()?)?;
        ctx.extensions = config.extensions();
        ctx.unrar_program = config.archive.unrar_program.clone();
        Ok(ctx)
    }

    /// A context with default extension lists.
    pub fn new(store: Store, upload_root: impl Into<PathBuf>) -> Result<Self> {
        let upload_root = upload_root.into();
        std::fs::create_dir_all(&upload_root)?;
        Ok(Context {
            store,
            upload_root,
            extensions: Extensions::default(),
            unrar_program: "unrar".to_string(),
            actor: None,
        })
    }

    pub fn with_actor(mut self, actor: Option<String>) -> Self {
        self.actor = actor;
        self
    }

    pub fn expander(&self) -> ArchiveExpander {
        ArchiveExpander::new(&self.upload_root).with_unrar_program(self.unrar_program.as_str())
    }

    pub fn actor(&self) -> &str {
        self.actor.as_deref().unwrap_or("-")
    }
}
