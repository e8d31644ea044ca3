//! Bundle catalog built at open time
//!
//! The catalog keeps one [`DocumentRecord`] per document plus the
//! section map and the Merkle fingerprint. Bodies are not retained;
//! [`DocumentStore::fetch`](crate::DocumentStore::fetch) re-reads them
//! on demand.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use skillpack_doc::{BundleFingerprint, ContentHash, Section, SectionName, TopicPath};

/// Catalog entry for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    /// File path relative to the references root (keeps the real extension)
    pub rel_path: PathBuf,
    /// Topic path addressing the document
    pub topic: TopicPath,
    /// Owning section
    pub section: SectionName,
    /// Display title (first H1, else frontmatter title, else topic slug)
    pub title: String,
    /// Content hash at load time
    pub hash: ContentHash,
    /// Estimated token count of the raw text
    pub tokens: usize,
}

/// Immutable catalog of a loaded bundle
#[derive(Debug, Clone)]
pub struct Catalog {
    records: IndexMap<TopicPath, DocumentRecord>,
    sections: IndexMap<SectionName, Section>,
    fingerprint: BundleFingerprint,
}

impl Catalog {
    pub(crate) fn new(
        records: IndexMap<TopicPath, DocumentRecord>,
        sections: IndexMap<SectionName, Section>,
    ) -> Self {
        let fingerprint = BundleFingerprint::from_entries(
            records.iter().map(|(topic, record)| (topic.clone(), record.hash)),
        );
        Self {
            records,
            sections,
            fingerprint,
        }
    }

    /// Catalog with no sections or records
    #[must_use]
    pub(crate) fn empty() -> Self {
        Self::new(IndexMap::new(), IndexMap::new())
    }

    /// All records in section order
    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.values()
    }

    /// Record for a topic
    #[must_use]
    pub fn record(&self, topic: &TopicPath) -> Option<&DocumentRecord> {
        self.records.get(topic)
    }

    /// Record whose file path matches the given references-relative path
    #[must_use]
    pub fn record_by_rel_path(&self, rel_path: &Path) -> Option<&DocumentRecord> {
        self.records.values().find(|r| r.rel_path == rel_path)
    }

    /// All sections in numeric order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Section by name
    #[must_use]
    pub fn section(&self, name: &SectionName) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Section names present in the catalog
    pub fn section_names(&self) -> impl Iterator<Item = &SectionName> {
        self.sections.keys()
    }

    /// Merkle fingerprint over the cataloged document hashes
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> &BundleFingerprint {
        &self.fingerprint
    }

    /// Number of cataloged documents
    #[inline]
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
