//! Skillpack lookup index
//!
//! Topic and keyword indexes over skill bundle documents.
//!
//! # Overview
//!
//! The index layer provides:
//! - **TopicIndex**: O(log n) topic lookup via radix tree
//! - **KeywordIndex**: inverted keyword index with field-weighted scoring
//! - **LookupIndex**: one facade combining both
//!
//! # Example
//!
//! ```rust
//! use skillpack_index::LookupIndex;
//! use skillpack_doc::{Document, SectionName, TopicPath};
//!
//! // Create index
//! let mut index = LookupIndex::new();
//!
//! // Index a document
//! let path: TopicPath = "02-handbook/narrowing".parse().unwrap();
//! let section: SectionName = "02-handbook".parse().unwrap();
//! let doc = Document::new(path, section, "# Narrowing\n\nGuards.\n".to_string()).unwrap();
//! index.index_document(&doc).unwrap();
//!
//! // Resolve a topic
//! let found = index.lookup("narrowing");
//! assert_eq!(found.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod entry;
pub mod keywords;
pub mod lookup;
pub mod topics;

// Re-exports
pub use entry::{slugify, TopicEntry};
pub use keywords::{extract_keywords, IndexedDoc, KeywordIndex, SearchHit};
pub use lookup::{IndexStats, LookupIndex};
pub use topics::{IndexError, TopicIndex};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for index operations
    pub use crate::{
        IndexError, IndexStats, KeywordIndex, LookupIndex, SearchHit, TopicEntry, TopicIndex,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
