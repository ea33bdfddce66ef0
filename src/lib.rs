//! Chan-Archiver: an incremental thread archiver for read-only imageboard JSON APIs
//!
//! This crate fetches board metadata, catalogs and thread snapshots, and
//! archives threads to disk: every new post lands exactly once in a per-thread
//! CSV table and every referenced attachment is downloaded exactly once.
//! Monitoring sessions keep re-polling a thread until it is closed.

pub mod api;
pub mod archive;
pub mod archiver;
pub mod config;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use api::FetchError;
pub use archive::{AttachmentError, StoreError};

/// Main error type for archiver operations
#[derive(Debug, Error)]
pub enum ArchiverError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Board not found: /{0}/")]
    BoardNotFound(String),

    #[error("Thread not found: /{board}/thread/{thread}")]
    ThreadNotFound { board: String, thread: u64 },

    #[error("Invalid board code: {0:?}")]
    InvalidBoard(String),

    #[error("Archive store error: {0}")]
    Store(#[from] StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for archiver operations
pub type Result<T> = std::result::Result<T, ArchiverError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use api::{Board, CatalogPage, Fetcher, HttpFetcher, Post, ThreadSnapshot};
pub use archiver::Archiver;
pub use config::Config;
pub use session::{PollSession, SessionConfig, SessionReport, SessionState, TerminationReason};
