//! Lieu: a neighbourhood search engine
//!
//! Lieu crawls a curated ring of sites (a webring), extracts lightweight
//! page descriptors, ingests them into a SQLite index and serves keyword,
//! paragraph and link-substring searches over HTTP.

pub mod config;
pub mod crawler;
pub mod extractor;
pub mod ingest;
pub mod query;
pub mod server;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Lieu operations
#[derive(Debug, Error)]
pub enum LieuError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Precrawl of {url} returned status {status}")]
    PrecrawlStatus { url: String, status: u16 },

    #[error("Invalid proxy URL: {0}")]
    InvalidProxy(String),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to bind port {port}: {source}")]
    Bind { port: u16, source: std::io::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Lieu operations
pub type Result<T> = std::result::Result<T, LieuError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extractor::{ExtractionRecord, RecordKind};
pub use storage::IndexStorage;
pub use url::{host_of, scrub_link};
