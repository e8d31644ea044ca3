//! Content-addressed documents
//!
//! A [`Document`] pairs a topic path with the raw markdown text read
//! from the bundle, its parsed body, and a content hash computed at
//! construction. Documents are immutable: the hash never changes after
//! creation, and [`Document::verify`] detects text drift.

use crate::hash::ContentHash;
use crate::markdown::DocBody;
use crate::section::SectionName;
use crate::topic::TopicPath;

/// An immutable document within a bundle
///
/// # Invariants
/// - `hash` is always the Blake3 hash of `text`
/// - `text` is non-empty (whitespace-only counts as empty)
/// - the topic path's first segment names the owning section
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: TopicPath,
    section: SectionName,
    hash: ContentHash,
    text: String,
    body: DocBody,
}

impl Document {
    /// Create a document from raw text (computes hash and parses body)
    ///
    /// # Errors
    /// Returns error if the text is empty or the path does not sit
    /// inside the given section
    pub fn new(
        path: TopicPath,
        section: SectionName,
        text: String,
    ) -> Result<Self, DocumentError> {
        if path.section_dir() != Some(section.to_string().as_str()) {
            return Err(DocumentError::SectionMismatch { path, section });
        }
        if text.trim().is_empty() {
            return Err(DocumentError::EmptyDocument(path));
        }
        let hash = ContentHash::compute(text.as_bytes());
        let body = DocBody::parse(&text);
        Ok(Self {
            path,
            section,
            hash,
            text,
            body,
        })
    }

    /// Topic path addressing this document
    #[inline]
    #[must_use]
    pub const fn path(&self) -> &TopicPath {
        &self.path
    }

    /// Section that owns this document
    #[inline]
    #[must_use]
    pub const fn section(&self) -> &SectionName {
        &self.section
    }

    /// Content hash of the raw text
    #[inline]
    #[must_use]
    pub const fn hash(&self) -> &ContentHash {
        &self.hash
    }

    /// Raw markdown text as read from the bundle
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed body structure
    #[inline]
    #[must_use]
    pub const fn body(&self) -> &DocBody {
        &self.body
    }

    /// Document title: first H1, else frontmatter title, else topic slug
    #[must_use]
    pub fn title(&self) -> String {
        self.body
            .display_title()
            .map(String::from)
            .unwrap_or_else(|| self.path.topic().unwrap_or_default().to_string())
    }

    /// Size of the raw text in bytes
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    /// Estimated token count of the raw text
    #[inline]
    #[must_use]
    pub fn token_estimate(&self) -> usize {
        crate::tokens::estimate_tokens(&self.text)
    }

    /// Verify integrity (useful after a re-read from disk)
    ///
    /// Returns true if hash matches text recomputation
    #[inline]
    #[must_use]
    pub fn verify(&self) -> bool {
        self.hash == ContentHash::compute(self.text.as_bytes())
    }

    /// Consume the document, returning the raw text
    #[inline]
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Errors related to document construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Document text was empty or whitespace-only
    #[error("document is empty: {0}")]
    EmptyDocument(TopicPath),

    /// Topic path does not belong to the given section
    #[error("topic {path} does not belong to section {section}")]
    SectionMismatch {
        path: TopicPath,
        section: SectionName,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handbook() -> SectionName {
        "02-handbook".parse().unwrap()
    }

    fn make_document(text: &str) -> Result<Document, DocumentError> {
        let path: TopicPath = "02-handbook/everyday-types".parse().unwrap();
        Document::new(path, handbook(), text.to_string())
    }

    #[test]
    fn document_creation_succeeds() {
        let doc = make_document("# Everyday Types\n\nThe basics.\n").unwrap();
        assert_eq!(doc.section().to_string(), "02-handbook");
        assert_eq!(doc.title(), "Everyday Types");
        assert_eq!(doc.hash(), &ContentHash::compute(doc.text().as_bytes()));
    }

    #[test]
    fn document_equality_follows_content() {
        let a = make_document("# Everyday Types\n\nThe basics.\n").unwrap();
        let b = make_document("# Everyday Types\n\nThe basics.\n").unwrap();
        let c = make_document("# Everyday Types\n\nDifferent prose.\n").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn document_rejects_empty_text() {
        assert!(matches!(
            make_document(""),
            Err(DocumentError::EmptyDocument(_))
        ));
        assert!(matches!(
            make_document("   \n\t\n"),
            Err(DocumentError::EmptyDocument(_))
        ));
    }

    #[test]
    fn document_rejects_section_mismatch() {
        let path: TopicPath = "03-reference/utility-types".parse().unwrap();
        let result = Document::new(path, handbook(), "# Utility Types\n".to_string());
        assert!(matches!(
            result,
            Err(DocumentError::SectionMismatch { .. })
        ));
    }

    #[test]
    fn document_verify_succeeds_for_valid() {
        let doc = make_document("# Narrowing\n\nGuards.\n").unwrap();
        assert!(doc.verify());
    }

    #[test]
    fn document_hash_deterministic() {
        let d1 = make_document("# Generics\n").unwrap();
        let d2 = make_document("# Generics\n").unwrap();
        assert_eq!(d1.hash(), d2.hash());
    }

    #[test]
    fn document_title_falls_back_to_topic_slug() {
        let doc = make_document("No heading here, just prose.\n").unwrap();
        assert_eq!(doc.title(), "everyday-types");
    }

    #[test]
    fn document_into_text() {
        let doc = make_document("# Classes\n").unwrap();
        let text = doc.into_text();
        assert_eq!(text, "# Classes\n");
    }

    #[test]
    fn document_token_estimate() {
        let doc = make_document("# Narrowing\n\nGuards.\n").unwrap();
        assert_eq!(doc.token_estimate(), doc.byte_len().div_ceil(4));
    }
}
