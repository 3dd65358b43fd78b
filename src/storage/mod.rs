//! Storage module
//!
//! The persistent index: a single SQLite file holding pages, domains, the
//! inverted index, full-text paragraphs, outgoing links and crawl stats.
//! The file is recreated from scratch on every ingest run; the server only
//! ever reads it.

mod schema;
mod search;
mod sqlite;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use search::{PageResult, ParagraphResult};
pub use sqlite::IndexStorage;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One row of the pages table, as written during ingest
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub url: String,
    pub title: String,
    pub about: String,
    pub lang: String,
}

/// One scored term occurrence bound for the inverted index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFragment {
    pub word: String,
    pub url: String,
    pub score: i64,
}

/// One full paragraph bound for the full-text table
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
    pub url: String,
}
