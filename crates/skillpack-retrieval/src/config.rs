//! Retrieval configuration
//!
//! [`RetrievalConfig`] tunes search limits and nests the store config;
//! it can be loaded from an optional `retrieval.toml` beside a bundle.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use skillpack_store::StoreConfig;

/// Config file name looked for under a bundle root
pub const CONFIG_FILE: &str = "retrieval.toml";

/// Default maximum number of search hits
pub const DEFAULT_MAX_HITS: usize = 8;

/// Default token budget across returned excerpts
pub const DEFAULT_TOKEN_BUDGET: usize = 2_000;

/// Default minimum score for a search hit to be returned
pub const DEFAULT_MIN_SCORE: f32 = 0.05;

/// Default maximum snippet length in characters
pub const DEFAULT_SNIPPET_MAX_CHARS: usize = 480;

/// Configuration for a [`RetrievalService`](crate::RetrievalService)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum number of search hits returned
    pub max_hits: usize,
    /// Token budget across returned excerpts
    pub token_budget: usize,
    /// Minimum score for a search hit to be returned
    pub min_score: f32,
    /// Maximum snippet length in characters
    pub snippet_max_chars: usize,
    /// Store tuning for the underlying bundle
    pub store: StoreConfig,
}

impl RetrievalConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum number of search hits
    #[inline]
    #[must_use]
    pub fn with_max_hits(mut self, hits: usize) -> Self {
        self.max_hits = hits;
        self
    }

    /// With token budget across returned excerpts
    #[inline]
    #[must_use]
    pub fn with_token_budget(mut self, tokens: usize) -> Self {
        self.token_budget = tokens;
        self
    }

    /// With minimum hit score
    #[inline]
    #[must_use]
    pub fn with_min_score(mut self, score: f32) -> Self {
        self.min_score = score;
        self
    }

    /// With maximum snippet length in characters
    #[inline]
    #[must_use]
    pub fn with_snippet_max_chars(mut self, chars: usize) -> Self {
        self.snippet_max_chars = chars;
        self
    }

    /// With store configuration
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Load configuration from `retrieval.toml` under `dir`
    ///
    /// A missing file yields the defaults; a present file must parse
    /// and validate.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed, or the
    /// resulting values fail [`validate`](Self::validate).
    pub async fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let config = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| ConfigError::io_error(&path, e))?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    /// Returns every violated constraint joined into one message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.max_hits == 0 {
            errors.push("max_hits must be greater than 0");
        }
        if self.token_budget == 0 {
            errors.push("token_budget must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            errors.push("min_score must be between 0.0 and 1.0");
        }
        if self.snippet_max_chars == 0 {
            errors.push("snippet_max_chars must be greater than 0");
        }
        if self.store.max_file_size == 0 {
            errors.push("store.max_file_size must be greater than 0");
        }
        if self.store.cache_capacity == 0 {
            errors.push("store.cache_capacity must be greater than 0");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                reasons: errors.join("\n  - "),
            })
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_hits: DEFAULT_MAX_HITS,
            token_budget: DEFAULT_TOKEN_BUDGET,
            min_score: DEFAULT_MIN_SCORE,
            snippet_max_chars: DEFAULT_SNIPPET_MAX_CHARS,
            store: StoreConfig::default(),
        }
    }
}

/// Errors loading or validating retrieval configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error on {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this shape
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration values violate a constraint
    #[error("invalid configuration:\n  - {reasons}")]
    Invalid {
        /// Violated constraints, one per line
        reasons: String,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
