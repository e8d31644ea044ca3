//! Combined lookup over topics and keywords
//!
//! [`LookupIndex`] fronts the trie-backed [`TopicIndex`] and the
//! inverted [`KeywordIndex`] with one insert path and a cascading
//! topic resolution: exact path, then topic slug, then prefix.

use serde::Serialize;
use tracing::debug;

use skillpack_doc::{Document, SectionName, TopicPath};

use crate::entry::{slugify, TopicEntry};
use crate::keywords::{IndexedDoc, KeywordIndex, SearchHit};
use crate::topics::{IndexError, TopicIndex};

/// Combined topic and keyword index for one bundle
pub struct LookupIndex {
    topics: TopicIndex,
    keywords: KeywordIndex,
}

impl Default for LookupIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupIndex {
    /// Create empty index
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: TopicIndex::new(),
            keywords: KeywordIndex::new(),
        }
    }

    /// Index a loaded document in both indexes
    ///
    /// # Errors
    /// Returns error if the topic path is already indexed
    pub fn index_document(&mut self, doc: &Document) -> Result<(), IndexError> {
        self.topics.insert(TopicEntry::from_document(doc))?;
        self.keywords.add(IndexedDoc::from_document(doc));
        Ok(())
    }

    /// Resolve a topic query to entries
    ///
    /// Tries, in order:
    /// 1. exact topic path (`02-handbook/narrowing`)
    /// 2. topic slug in any section (`narrowing`, or free text like
    ///    "Everyday Types" normalized to `everyday-types`)
    /// 3. path prefix completion (`02-handbook/nar`)
    ///
    /// Returns an empty list when nothing matches; callers typically
    /// fall back to [`search`](Self::search).
    #[must_use]
    pub fn lookup(&self, query: &str) -> Vec<TopicEntry> {
        if let Ok(path) = query.parse::<TopicPath>() {
            if let Some(entry) = self.topics.get(&path) {
                return vec![entry];
            }
        }

        let slug = slugify(query);
        if !slug.is_empty() {
            let entries = self.topics.find_by_topic(&slug);
            if !entries.is_empty() {
                return entries;
            }
        }

        let entries = self.topics.lookup_prefix(query);
        debug!(query, entries = entries.len(), "topic lookup");
        entries
    }

    /// Search document text for a free-text query
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.keywords.search(query, limit)
    }

    /// Entry for an exact topic path
    #[inline]
    #[must_use]
    pub fn entry(&self, path: &TopicPath) -> Option<TopicEntry> {
        self.topics.get(path)
    }

    /// All entries in a section, sorted by path
    #[inline]
    #[must_use]
    pub fn section_topics(&self, section: &SectionName) -> Vec<TopicEntry> {
        self.topics.section_topics(section)
    }

    /// Sections with at least one indexed topic, in numeric order
    #[inline]
    #[must_use]
    pub fn sections(&self) -> Vec<SectionName> {
        self.topics.sections()
    }

    /// Number of indexed topics
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Index statistics
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            topic_count: self.topics.len(),
            unique_keywords: self.keywords.unique_keywords(),
        }
    }
}

/// Statistics for index introspection
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexStats {
    /// Number of indexed topics
    pub topic_count: usize,
    /// Number of distinct keywords
    pub unique_keywords: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_doc(path: &str, text: &str) -> Document {
        let path: TopicPath = path.parse().unwrap();
        let section: SectionName = path.section_dir().unwrap().parse().unwrap();
        Document::new(path, section, text.to_string()).unwrap()
    }

    fn sample_index() -> LookupIndex {
        let mut index = LookupIndex::new();
        index
            .index_document(&make_doc(
                "01-getting-started/ts-for-js-programmers",
                "# TypeScript for JavaScript Programmers\n\nTypes by inference.\n",
            ))
            .unwrap();
        index
            .index_document(&make_doc(
                "02-handbook/everyday-types",
                "# Everyday Types\n\nPrimitives: string, number, boolean.\n",
            ))
            .unwrap();
        index
            .index_document(&make_doc(
                "02-handbook/narrowing",
                "# Narrowing\n\nUsing typeof guards to narrow unions.\n",
            ))
            .unwrap();
        index
    }

    #[test]
    fn lookup_exact_path() {
        let index = sample_index();
        let entries = index.lookup("02-handbook/everyday-types");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Everyday Types");
    }

    #[test]
    fn lookup_bare_slug() {
        let index = sample_index();
        let entries = index.lookup("narrowing");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.to_string(), "02-handbook/narrowing");
    }

    #[test]
    fn lookup_free_text_title() {
        let index = sample_index();
        let entries = index.lookup("Everyday Types");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.to_string(), "02-handbook/everyday-types");
    }

    #[test]
    fn lookup_prefix_completion() {
        let index = sample_index();
        let entries = index.lookup("02-handbook/nar");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Narrowing");
    }

    #[test]
    fn lookup_miss_is_empty() {
        let index = sample_index();
        assert!(index.lookup("nonexistent-topic").is_empty());
    }

    #[test]
    fn search_falls_back_on_keywords() {
        let index = sample_index();
        // "guards" appears only in body text, so lookup misses
        assert!(index.lookup("guards").is_empty());

        let hits = index.search("guards", 20);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path.to_string(), "02-handbook/narrowing");
    }

    #[test]
    fn duplicate_document_rejected() {
        let mut index = sample_index();
        let doc = make_doc("02-handbook/narrowing", "# Narrowing\n\nAgain.\n");
        assert!(matches!(
            index.index_document(&doc),
            Err(IndexError::DuplicateTopic { .. })
        ));
    }

    #[test]
    fn stats_reflect_contents() {
        let index = sample_index();
        let stats = index.stats();
        assert_eq!(stats.topic_count, 3);
        assert!(stats.unique_keywords > 0);
    }

    #[test]
    fn section_listing() {
        let index = sample_index();
        let sections = index.sections();
        assert_eq!(sections.len(), 2);

        let handbook: SectionName = "02-handbook".parse().unwrap();
        let topics = index.section_topics(&handbook);
        assert_eq!(topics.len(), 2);
    }
}
