//! Upload text logs (plain files or archives of them) into SQLite and
//! search them by keyword and date range.

pub mod archive;
pub mod classify;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod query;
pub mod upload;

pub use classify::{classify, FileKind};
pub use context::Context;
pub use db::Store;
pub use error::{LogsiftError, Result};
pub use ingest::ingest;
pub use models::{Log, NewLog};
pub use normalize::normalize;
pub use query::{build_query, search, Order, SearchFilter};
