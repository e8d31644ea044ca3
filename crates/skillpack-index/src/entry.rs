//! Index entries
//!
//! A [`TopicEntry`] is what lookups return: the addressing and identity
//! of a document without its body text.

use serde::{Deserialize, Serialize};

use skillpack_doc::{ContentHash, Document, SectionName, TopicPath};

/// Lightweight record of an indexed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    /// Topic path addressing the document
    pub path: TopicPath,
    /// Owning section
    pub section: SectionName,
    /// Document title
    pub title: String,
    /// Content hash of the document text
    pub hash: ContentHash,
}

impl TopicEntry {
    /// Create an entry from parts
    #[inline]
    #[must_use]
    pub fn new(
        path: TopicPath,
        section: SectionName,
        title: impl Into<String>,
        hash: ContentHash,
    ) -> Self {
        Self {
            path,
            section,
            title: title.into(),
            hash,
        }
    }

    /// Build an entry from a loaded document
    #[inline]
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            path: doc.path().clone(),
            section: doc.section().clone(),
            title: doc.title(),
            hash: *doc.hash(),
        }
    }

    /// Trie key for this entry
    #[inline]
    #[must_use]
    pub fn trie_key(&self) -> String {
        self.path.to_string()
    }
}

/// Normalize free text into slug form for topic matching
///
/// "Everyday Types" becomes "everyday-types".
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if c == '_' {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
