//! Configuration management for ghdash
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GHDASH_*)
//! 3. Config file (~/.config/ghdash/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// GitHub-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Organization or user whose repositories and projects are shown
    pub owner: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: "Oracommit".to_string(),
        }
    }
}

/// Settings for the batched fetch layer
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Number of repositories fetched concurrently
    pub batch_size: usize,

    /// Pause between two batches
    #[serde(with = "humantime_serde")]
    pub batch_delay: Duration,

    /// Page size for paginated endpoints (max 100)
    pub page_size: u8,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_delay: Duration::from_millis(100),
            page_size: 100,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration
    pub github: GitHubConfig,

    /// Fetch layer configuration
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        debug!(path = %path.display(), "Loaded config file");
        config.validated()
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/ghdash/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghdash").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GHDASH_OWNER: Organization or user to read from
    /// - GHDASH_BATCH_SIZE: Concurrent repository fetches per batch
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(owner) = lookup("GHDASH_OWNER").filter(|o| !o.trim().is_empty()) {
            self.github.owner = owner.trim().to_string();
        }

        let batch_size = lookup("GHDASH_BATCH_SIZE").and_then(|s| s.trim().parse().ok());
        if let Some(size) = batch_size {
            if size > 0 {
                self.fetch.batch_size = size;
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, owner: Option<String>) -> Self {
        if let Some(owner) = owner {
            self.github.owner = owner;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(owner: Option<String>) -> Result<Self> {
        Ok(Self::load()?.with_env_overrides().with_cli_overrides(owner))
    }

    fn validated(self) -> Result<Self> {
        if self.fetch.batch_size == 0 {
            return Err(Error::Config("fetch.batch_size must be at least 1".to_string()));
        }
        if self.fetch.page_size == 0 || self.fetch.page_size > 100 {
            return Err(Error::Config(format!(
                "fetch.page_size must be between 1 and 100, got {}",
                self.fetch.page_size
            )));
        }
        Ok(self)
    }
}
