use crate::archive::DiffStrategy;
use serde::Deserialize;

/// Main configuration structure for the archiver
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults for the public 4chan API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Remote API locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for the JSON endpoints (boards, catalogs, threads)
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// Base URL for attachment binaries
    #[serde(rename = "media-base")]
    pub media_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://a.4cdn.org/".to_string(),
            media_base: "https://i.4cdn.org/".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// URL with information about the client (may be empty)
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: "chan-archiver".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
        }
    }
}

/// Archiving behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Directory under which `{board}_{thread}` archives are created
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Seconds to wait between polls while monitoring a thread
    #[serde(rename = "poll-interval")]
    pub poll_interval: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Maximum number of attachment downloads in flight during one cycle
    #[serde(rename = "max-concurrent-downloads")]
    pub max_concurrent_downloads: u32,

    /// How new posts are told apart from archived ones
    #[serde(rename = "diff-strategy")]
    pub diff_strategy: DiffStrategy,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_dir: "./archive".to_string(),
            poll_interval: 15,
            request_timeout: 30,
            max_concurrent_downloads: 4,
            diff_strategy: DiffStrategy::default(),
        }
    }
}
