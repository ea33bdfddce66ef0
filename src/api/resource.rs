//! Remote resource kinds and their locations
//!
//! Every read the archiver performs targets one [`Resource`]. URLs are built
//! by joining a relative path onto the configured API or media base, so a
//! mock server or mirror can stand in for the public hosts.

use crate::archive::AttachmentRef;
use crate::config::ApiConfig;
use std::fmt;
use url::Url;

/// Base URLs for the JSON API and attachment host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: Url,
    media: Url,
}

impl Endpoints {
    /// Creates endpoints from two base URLs
    ///
    /// A missing trailing slash is added so relative joins keep the base path.
    pub fn new(api_base: &str, media_base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            api: with_trailing_slash(Url::parse(api_base)?),
            media: with_trailing_slash(Url::parse(media_base)?),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, url::ParseError> {
        Self::new(&config.api_base, &config.media_base)
    }

    pub fn api_base(&self) -> &Url {
        &self.api
    }

    pub fn media_base(&self) -> &Url {
        &self.media
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// A remote resource the archiver can read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Metadata for every board (`boards.json`)
    Boards,

    /// All catalog pages of a board
    Catalog { board: String },

    /// Full post list of one thread
    Thread { board: String, thread: u64 },

    /// Thread numbers in a board's archive
    Archive { board: String },

    /// Binary attachment bytes
    Attachment(AttachmentRef),
}

impl Resource {
    /// Short name of the resource kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Boards => "boards",
            Self::Catalog { .. } => "catalog",
            Self::Thread { .. } => "thread",
            Self::Archive { .. } => "archive",
            Self::Attachment(_) => "attachment",
        }
    }

    /// Resolves the resource against the configured endpoints
    pub fn url(&self, endpoints: &Endpoints) -> Result<Url, url::ParseError> {
        match self {
            Self::Boards => endpoints.api.join("boards.json"),
            Self::Catalog { board } => endpoints.api.join(&format!("{}/catalog.json", board)),
            Self::Thread { board, thread } => endpoints
                .api
                .join(&format!("{}/thread/{}.json", board, thread)),
            Self::Archive { board } => endpoints.api.join(&format!("{}/archive.json", board)),
            Self::Attachment(attachment) => endpoints.media.join(&format!(
                "{}/{}",
                attachment.board,
                attachment.filename()
            )),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boards => write!(f, "boards"),
            Self::Catalog { board } => write!(f, "/{}/catalog", board),
            Self::Thread { board, thread } => write!(f, "/{}/thread/{}", board, thread),
            Self::Archive { board } => write!(f, "/{}/archive", board),
            Self::Attachment(attachment) => {
                write!(f, "/{}/{}", attachment.board, attachment.filename())
            }
        }
    }
}

/// Returns true if `code` looks like a board code (non-empty ASCII alphanumerics)
pub fn is_valid_board(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Board and thread identifiers extracted from a page URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadLocator {
    pub board: Option<String>,
    pub thread: Option<u64>,
}

impl ThreadLocator {
    /// Extracts the board code and thread number from a board or thread URL
    ///
    /// Accepts URLs like `https://boards.4chan.org/g/thread/123456#p123460`
    /// or `https://boards.4chan.org/g/catalog`. Parts that cannot be found
    /// are left as `None`.
    pub fn from_url(input: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(input)?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let board = segments
            .first()
            .filter(|seg| is_valid_board(seg))
            .map(|seg| seg.to_string());

        let thread = segments
            .iter()
            .position(|seg| *seg == "thread")
            .and_then(|idx| segments.get(idx + 1))
            .and_then(|seg| seg.trim_end_matches(".json").parse::<u64>().ok());

        Ok(Self { board, thread })
    }
}
