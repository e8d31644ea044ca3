//! Service types
//!
//! Request identifiers and the result shapes retrieval operations
//! return to hosts.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use skillpack_doc::{Section, TopicPath};

/// Unique identifier for one retrieval request
///
/// Every service operation generates a fresh id and carries it on its
/// tracing span, so log lines from one call can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of one section for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    /// Section ordinal
    pub number: u8,
    /// Section slug
    pub slug: String,
    /// Number of documents in the section
    pub doc_count: usize,
    /// Topic paths in catalog order
    pub topics: Vec<TopicPath>,
}

impl SectionSummary {
    /// Summarize a cataloged section
    #[must_use]
    pub fn from_section(section: &Section) -> Self {
        Self {
            number: section.number().get(),
            slug: section.name().slug().to_string(),
            doc_count: section.len(),
            topics: section.topics().to_vec(),
        }
    }
}

/// A search hit with its display snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
    /// Topic path of the matched document
    pub path: TopicPath,
    /// Document title
    pub title: String,
    /// Match score in `0.0..=1.0`
    pub score: f32,
    /// Leading matched paragraph, truncated to the snippet length
    pub snippet: String,
    /// Estimated token cost of the snippet
    pub tokens: usize,
}
