//! Error types for the document store

use std::path::PathBuf;

use skillpack_doc::{ContentHash, DocumentError, TopicPath};

use crate::manifest::ManifestError;

/// Errors during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error touching a bundle path
    #[error("io error on {path}: {source}")]
    Io {
        /// Path the operation touched
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Bundle root is not a directory
    #[error("bundle root is not a directory: {root}")]
    NotADirectory {
        /// Offending root path
        root: PathBuf,
    },

    /// Topic is not in the catalog
    #[error("unknown topic: {topic}")]
    UnknownTopic {
        /// Requested topic path
        topic: TopicPath,
    },

    /// Fetched content no longer matches the cataloged hash
    #[error("content hash mismatch for {path}: cataloged {expected}, read {actual}")]
    HashMismatch {
        /// References-relative document path
        path: PathBuf,
        /// Hash recorded in the catalog
        expected: ContentHash,
        /// Hash of the bytes just read
        actual: ContentHash,
    },

    /// File exceeds the configured size limit
    #[error("file too large: {path} ({size} bytes, limit {limit})")]
    FileTooLarge {
        /// References-relative document path
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Manifest parsing failed
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Document construction failed
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Load error shared with other fetchers of the same document
    ///
    /// Coalesced cache loads hand every waiter the same error, so it
    /// arrives behind an `Arc`.
    #[error(transparent)]
    Shared(std::sync::Arc<StoreError>),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
