//! Store configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum document file size (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default document cache capacity (entries)
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// Configuration for opening a [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum document file size in bytes
    pub max_file_size: u64,
    /// Document cache capacity in entries
    pub cache_capacity: u64,
    /// Cache time-to-live in seconds (no expiry when absent)
    pub cache_ttl_secs: Option<u64>,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum file size in bytes
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// With cache capacity in entries
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, entries: u64) -> Self {
        self.cache_capacity = entries;
        self
    }

    /// With cache time-to-live
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = Some(ttl.as_secs());
        self
    }

    /// Cache time-to-live as a duration, when configured
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: None,
        }
    }
}
