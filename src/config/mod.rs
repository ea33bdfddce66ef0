//! Configuration module for the archiver
//!
//! Settings come from an optional TOML file with `[api]`, `[user-agent]` and
//! `[archive]` tables. A missing file is not an error for the CLI:
//! [`Config::default`] targets the public 4chan API.
//!
//! # Example
//!
//! ```no_run
//! use chan_archiver::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("archiver.toml")).unwrap();
//! println!("Archives go to: {}", config.archive.output_dir);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, ArchiveConfig, Config, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
