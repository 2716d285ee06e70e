//! Configuration file support for pkgtrust.
//!
//! Provides YAML-based configuration through `pkgtrust.config.yml` files,
//! including data structures, file loading, validation, and the credential
//! lookup used to enable the token-gated advisory source.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::adapters::outbound::network::RetryPolicy;
use crate::shared::Result;

const CONFIG_FILENAME: &str = "pkgtrust.config.yml";

/// Environment variable consulted when the config file carries no token.
const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Output format name ("json" or "table").
    pub format: Option<String>,
    /// GitHub API token for the advisory-graph source and higher rate
    /// limits. Absence degrades that source, never fails the scan.
    pub github_token: Option<String>,
    /// Maximum attempts per upstream request.
    pub max_attempts: Option<u32>,
    /// Base backoff delay in milliseconds.
    pub retry_base_delay_ms: Option<u64>,
    /// Per-attempt timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Fail the scan (exit code 1) when any package scores below this.
    pub min_score: Option<u8>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Builds the retry policy from configured overrides over defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            base_delay: self
                .retry_base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_delay),
            per_attempt_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.per_attempt_timeout),
        }
    }

    /// Resolves the GitHub token: config file first, environment second.
    pub fn github_token(&self) -> Option<String> {
        self.github_token
            .clone()
            .filter(|token| !token.is_empty())
            .or_else(|| std::env::var(GITHUB_TOKEN_ENV).ok().filter(|t| !t.is_empty()))
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(max_attempts) = config.max_attempts {
        if max_attempts == 0 {
            bail!(
                "Invalid config: max_attempts must be at least 1.\n\n\
                 💡 Hint: Use 1 to disable retries, not 0."
            );
        }
    }

    if let Some(min_score) = config.min_score {
        if min_score > 100 {
            bail!(
                "Invalid config: min_score must be between 0 and 100, got {}.",
                min_score
            );
        }
    }

    if let Some(format) = config.format.as_deref() {
        if !matches!(format, "json" | "table") {
            bail!(
                "Invalid config: unknown format '{}'.\n\n\
                 💡 Hint: Supported formats are 'json' and 'table'.",
                format
            );
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
