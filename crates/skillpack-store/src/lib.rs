//! Skillpack document store
//!
//! The trusted boundary between a skill bundle on disk and the rest of
//! the system. Opening a bundle scans `references/` once, parses every
//! document, and keeps a catalog of records plus a Merkle fingerprint;
//! bodies are re-read on demand through a path-addressed cache.
//!
//! # Core Operations
//!
//! - **Open**: scan the bundle, parse the manifest, build the catalog
//! - **Fetch**: re-read one document, verified against its cataloged hash
//! - **Verify**: run structural integrity checks, producing a report
//!
//! # Example
//!
//! ```rust,ignore
//! use skillpack_store::{DocumentStore, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DocumentStore::open("./typescript-tutorial", StoreConfig::default()).await?;
//!
//! let topic = "02-handbook/narrowing".parse()?;
//! let doc = store.fetch(&topic).await?;
//! println!("{}", doc.text());
//!
//! let report = store.verify().await;
//! assert!(report.is_ok());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod integrity;
pub mod loader;
pub mod manifest;
pub mod store;

// Re-exports for convenience
pub use cache::{CacheStats, DocumentCache};
pub use catalog::{Catalog, DocumentRecord};
pub use config::{StoreConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_FILE_SIZE};
pub use error::{StoreError, StoreResult};
pub use integrity::{IntegrityError, IntegrityReport, IntegrityWarning};
pub use loader::{LoadIssue, REFERENCES_DIR};
pub use manifest::{BundleLayout, ManifestError, SectionClaim, SkillManifest, MANIFEST_FILE};
pub use store::DocumentStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the document store
    pub use crate::cache::{CacheStats, DocumentCache};
    pub use crate::config::StoreConfig;
    pub use crate::error::{StoreError, StoreResult};
    pub use crate::integrity::{IntegrityError, IntegrityReport, IntegrityWarning};
    pub use crate::manifest::{BundleLayout, SkillManifest};
    pub use crate::store::DocumentStore;
    pub use skillpack_doc::{Document, SectionName, TopicPath};
}
