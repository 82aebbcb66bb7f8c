//! API key resolution.
//!
//! Rather than requiring `--api-key` on every invocation, the key is
//! resolved through a chain:
//!
//! 1. `--api-key <key>`: explicit per-command override
//! 2. `ENRICH_API_KEY` env var: process/session level
//! 3. `api-key` in `~/.enrich/config.toml`: global default
//!
//! The key is opaque. It is passed through to the provider untouched.

use std::env;

use crate::config::{Config, ConfigError};

/// Environment variable consulted when no explicit key is given.
pub const API_KEY_ENV: &str = "ENRICH_API_KEY";

/// Resolve the API key from the tiered resolution chain.
///
/// Empty values at any tier are skipped. Returns
/// [`ConfigError::MissingApiKey`] when no tier yields a key.
pub fn resolve_api_key(explicit: Option<&str>, config: &Config) -> Result<String, ConfigError> {
    resolve_with_env(explicit, env::var(API_KEY_ENV).ok(), config)
}

fn resolve_with_env(
    explicit: Option<&str>,
    from_env: Option<String>,
    config: &Config,
) -> Result<String, ConfigError> {
    // 1. Explicit --api-key flag.
    if let Some(key) = explicit
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    // 2. ENRICH_API_KEY environment variable.
    if let Some(key) = from_env
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    // 3. ~/.enrich/config.toml.
    config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .ok_or(ConfigError::MissingApiKey)
}
