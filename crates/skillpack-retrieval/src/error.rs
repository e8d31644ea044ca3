//! Error types for the retrieval service

use skillpack_index::IndexError;
use skillpack_store::StoreError;

use crate::config::ConfigError;

/// Errors during retrieval operations
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Query or term is empty
    #[error("query is empty")]
    EmptyQuery,

    /// No topic or keyword matched the term
    #[error("unknown topic: {term}")]
    UnknownTopic {
        /// Term as the caller gave it
        term: String,
    },

    /// Path does not address a document in the bundle
    #[error("unknown path: {path}")]
    UnknownPath {
        /// Path as the caller gave it
        path: String,
    },

    /// Store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Indexing failed
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Configuration failed to load or validate
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for retrieval operations
pub type RetrievalResult<T> = Result<T, RetrievalError>;
