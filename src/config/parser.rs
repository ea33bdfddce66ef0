//! Reading archiver settings from disk
//!
//! Every section is optional. A file containing only `[archive]` keeps the
//! public API endpoints and the default User-Agent from [`Config::default`].

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses `[api]`, `[user-agent]` and `[archive]` from TOML text and checks
/// every value against its allowed range
///
/// Unknown diff strategies surface as [`ConfigError::Parse`], out of range
/// values as [`ConfigError::Validation`].
///
/// [`ConfigError::Parse`]: crate::ConfigError::Parse
/// [`ConfigError::Validation`]: crate::ConfigError::Validation
pub fn parse_config(text: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Loads an archiver config file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use chan_archiver::config::load_config;
///
/// let config = load_config(Path::new("archiver.toml")).unwrap();
/// println!("Poll interval: {}s", config.archive.poll_interval);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Hex SHA-256 of a config file's bytes
///
/// Logged when an archive run starts so its output can be tied back to the
/// settings that produced it.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    Ok(fingerprint(std::fs::read(path)?.as_slice()))
}

/// Loads a config file and fingerprints the exact text that was parsed
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    Ok((config, fingerprint(text.as_bytes())))
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
