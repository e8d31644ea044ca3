//! Skillpack retrieval service
//!
//! The host-facing query surface over an opened skill bundle. One
//! [`RetrievalService`] couples the document store with a lookup index
//! and exposes the operations assistants call: section listings, topic
//! lookup, ranked search with budgeted excerpts, document fetch, and
//! integrity verification. Every operation runs under a fresh request
//! id so concurrent queries stay distinguishable in traces.
//!
//! # Core Operations
//!
//! - **Sections**: ordered summaries of the bundle's numbered sections
//! - **Lookup**: resolve a topic term to document paths
//! - **Search**: rank documents for a free-text query, excerpt the
//!   leading matched paragraph, and cut at the hit and token budgets
//! - **Fetch**: return one full document, verified on read
//!
//! # Example
//!
//! ```rust,ignore
//! use skillpack_retrieval::{RetrievalConfig, RetrievalService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service =
//!     RetrievalService::open("./typescript-tutorial", RetrievalConfig::default()).await?;
//!
//! for excerpt in service.search("type narrowing").await? {
//!     println!("{} ({:.2}): {}", excerpt.path, excerpt.score, excerpt.snippet);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod error;
pub mod service;
pub mod snippet;
pub mod types;

// Re-exports for convenience
pub use config::{ConfigError, RetrievalConfig, CONFIG_FILE};
pub use error::{RetrievalError, RetrievalResult};
pub use service::RetrievalService;
pub use types::{Excerpt, RequestId, SectionSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for querying skill bundles
    pub use crate::config::RetrievalConfig;
    pub use crate::error::{RetrievalError, RetrievalResult};
    pub use crate::service::RetrievalService;
    pub use crate::types::{Excerpt, RequestId, SectionSummary};
    pub use skillpack_doc::{Document, TopicPath};
}
