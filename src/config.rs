//! Enrich configuration.
//!
//! Loaded from `~/.enrich/config.toml`. Every key is optional and a missing
//! file is the same as an empty one; command-line flags override whatever
//! the file says.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::sink::FailureRendering;

/// Errors that stop a batch before any lookup is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("requests per minute must be a positive integer, got {0}")]
    InvalidRateLimit(i64),

    #[error(
        "API key required: pass --api-key, set ENRICH_API_KEY, \
         or add `api-key = \"...\"` to ~/.enrich/config.toml"
    )]
    MissingApiKey,

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read input {}: {source}", .path.display())]
    Input { path: PathBuf, source: io::Error },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Enrich configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Provider API key.
    pub api_key: Option<String>,

    /// Lookup budget. Defaults to 300.
    pub requests_per_minute: Option<i64>,

    /// Provider base URL, for proxies and test doubles.
    pub base_url: Option<String>,

    /// Per-request timeout applied by the HTTP client.
    pub timeout_secs: Option<u64>,

    /// How failed lookups appear in the output.
    pub failures: Option<FailureRendering>,

    /// Rewrite the output after every completed lookup.
    pub incremental: Option<bool>,
}

impl Config {
    /// Load config from `~/.enrich/config.toml`.
    ///
    /// Returns the default config when the file (or home directory) is absent.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config file path: `~/.enrich/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".enrich").join("config.toml"))
    }
}
