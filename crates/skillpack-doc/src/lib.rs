//! Skillpack document primitives
//!
//! Typed, content-addressed documents for skill bundles.
//!
//! # Core Concepts
//!
//! - [`Document`]: Immutable markdown document with a content hash
//! - [`ContentHash`]: 32-byte Blake3 hash for content addressing
//! - [`TopicPath`]: Hierarchical addressing of documents (`section/topic`)
//! - [`SectionName`]: Numbered section directories (`NN-slug`)
//! - [`DocBody`](markdown::DocBody): Parsed body structure (title, outline, code)
//! - [`BundleFingerprint`]: Merkle root over a whole bundle
//!
//! # Example
//!
//! ```rust,ignore
//! use skillpack_doc::{Document, SectionName, TopicPath};
//!
//! let path: TopicPath = "02-handbook/everyday-types".parse()?;
//! let section: SectionName = "02-handbook".parse()?;
//! let doc = Document::new(path, section, text)?;
//!
//! // Content hash is computed automatically
//! println!("Hash: {}", doc.hash());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod document;
mod fingerprint;
mod hash;
mod section;
mod tokens;
mod topic;

/// Markdown body parsing
pub mod markdown;

// Re-exports
pub use document::{Document, DocumentError};
pub use fingerprint::{Blake3Hasher, BundleFingerprint, DocProof};
pub use hash::{ContentHash, HashError};
pub use markdown::{split_frontmatter, CodeBlock, DocBody, DocFrontmatter, Heading};
pub use section::{
    canonical_sections, Section, SectionError, SectionName, SectionNumber,
    CANONICAL_SECTION_SLUGS,
};
pub use tokens::{estimate_tokens, CHARS_PER_TOKEN};
pub use topic::{TopicPath, TopicPathError, DOC_EXTENSION, DOC_EXTENSIONS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
