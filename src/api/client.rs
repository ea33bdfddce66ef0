//! HTTP fetcher implementation
//!
//! This module handles every network read the archiver performs:
//! - Building the HTTP client with a proper user agent string
//! - GET requests for the JSON resources and attachment binaries
//! - Status and decode error classification
//!
//! There is no retry here. A monitoring session re-polls on its own schedule,
//! and one-off reads report failures to the caller.

use crate::api::models::{BoardList, CatalogPage, ThreadSnapshot};
use crate::api::resource::{Endpoints, Resource};
use crate::api::{FetchError, FetchResult};
use crate::archive::AttachmentRef;
use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Single-shot reads of remote resources
///
/// Implementations hold no state across calls. The poll loop and the
/// attachment resolver only ever see this trait, so tests can substitute a
/// scripted fetcher.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches metadata for every board
    async fn fetch_boards(&self) -> FetchResult<BoardList>;

    /// Fetches all catalog pages of a board
    async fn fetch_catalog(&self, board: &str) -> FetchResult<Vec<CatalogPage>>;

    /// Fetches the thread numbers in a board's archive
    async fn fetch_archive(&self, board: &str) -> FetchResult<Vec<u64>>;

    /// Fetches the current snapshot of a thread
    async fn fetch_thread(&self, board: &str, thread: u64) -> FetchResult<ThreadSnapshot>;

    /// Fetches the raw bytes of an attachment
    async fn fetch_attachment(&self, attachment: &AttachmentRef) -> FetchResult<Vec<u8>>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use chan_archiver::api::build_http_client;
/// use chan_archiver::config::UserAgentConfig;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent as `Name/Version (+ContactURL)`
fn user_agent_string(config: &UserAgentConfig) -> String {
    if config.contact_url.is_empty() {
        format!("{}/{}", config.client_name, config.client_version)
    } else {
        format!(
            "{}/{} (+{})",
            config.client_name, config.client_version, config.contact_url
        )
    }
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoints: Endpoints,
}

impl HttpFetcher {
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Sends a GET for the resource and classifies the response status
    async fn get(&self, resource: &Resource) -> FetchResult<Response> {
        let url = resource
            .url(&self.endpoints)
            .map_err(|e| FetchError::InvalidUrl {
                resource: resource.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(kind = resource.kind(), %url, "Fetching resource");

        let response =
            self.client
                .get(url.clone())
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Reads the full response body
    async fn get_bytes(&self, resource: &Resource) -> FetchResult<(String, Vec<u8>)> {
        let response = self.get(resource).await?;
        let url = response.url().to_string();

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        Ok((url, body.to_vec()))
    }

    /// Fetches a JSON resource and decodes it
    async fn get_json<T: DeserializeOwned>(&self, resource: &Resource) -> FetchResult<T> {
        let (url, body) = self.get_bytes(resource).await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_boards(&self) -> FetchResult<BoardList> {
        self.get_json(&Resource::Boards).await
    }

    async fn fetch_catalog(&self, board: &str) -> FetchResult<Vec<CatalogPage>> {
        self.get_json(&Resource::Catalog {
            board: board.to_string(),
        })
        .await
    }

    async fn fetch_archive(&self, board: &str) -> FetchResult<Vec<u64>> {
        self.get_json(&Resource::Archive {
            board: board.to_string(),
        })
        .await
    }

    async fn fetch_thread(&self, board: &str, thread: u64) -> FetchResult<ThreadSnapshot> {
        self.get_json(&Resource::Thread {
            board: board.to_string(),
            thread,
        })
        .await
    }

    async fn fetch_attachment(&self, attachment: &AttachmentRef) -> FetchResult<Vec<u8>> {
        let (_, body) = self
            .get_bytes(&Resource::Attachment(attachment.clone()))
            .await?;
        Ok(body)
    }
}
