//! Remote API access
//!
//! This module covers everything that talks to the read-only JSON API:
//! - Resource kinds and their URLs
//! - Decoded record types (boards, catalog pages, thread snapshots)
//! - The [`Fetcher`] seam and its reqwest-backed implementation
//! - Comment markup rendering

mod client;
mod markup;
mod models;
mod resource;

pub use client::{build_http_client, Fetcher, HttpFetcher};
pub use markup::comment_to_text;
pub use models::{Board, BoardList, CatalogPage, CatalogThread, Post, ThreadSnapshot};
pub use resource::{is_valid_board, Endpoints, Resource, ThreadLocator};

use thiserror::Error;

/// Errors raised by a single network read
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Malformed payload from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Cannot build URL for {resource}: {message}")]
    InvalidUrl { resource: String, message: String },
}

impl FetchError {
    /// Returns true if the remote resource does not exist (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
