//! Topic index with radix tree
//!
//! Provides [`TopicIndex`] for O(log n) topic lookup using radix_trie.

use dashmap::DashMap;
use parking_lot::RwLock;
use radix_trie::{Trie, TrieCommon};

use skillpack_doc::{SectionName, TopicPath};

use crate::entry::TopicEntry;

/// Topic index using radix_trie for prefix matching
///
/// We use radix_trie for efficient:
/// - Exact lookups by topic path
/// - Prefix completion over `section/topic` keys
///
/// The index is thread-safe with concurrent reads via DashMap for the
/// per-section listing and RwLock for the trie.
#[derive(Debug)]
pub struct TopicIndex {
    /// Radix trie mapping path -> entry
    trie: RwLock<Trie<String, TopicEntry>>,

    /// Per-section listing: section -> topic paths
    by_section: DashMap<SectionName, Vec<TopicPath>>,
}

impl TopicIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            trie: RwLock::new(Trie::new()),
            by_section: DashMap::new(),
        }
    }

    /// Insert entry into index
    ///
    /// # Errors
    /// Returns error if the topic path is already indexed
    pub fn insert(&self, entry: TopicEntry) -> Result<(), IndexError> {
        let key = entry.trie_key();

        let section = entry.section.clone();
        let path = entry.path.clone();

        let mut trie = self.trie.write();
        if trie.get(&key).is_some() {
            return Err(IndexError::DuplicateTopic { path });
        }
        trie.insert(key, entry);
        drop(trie);

        self.by_section.entry(section).or_default().push(path);

        Ok(())
    }

    /// Lookup exact entry by topic path
    #[must_use]
    pub fn get(&self, path: &TopicPath) -> Option<TopicEntry> {
        let key = path.to_string();
        self.trie.read().get(&key).cloned()
    }

    /// Check if topic exists in index
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &TopicPath) -> bool {
        self.get(path).is_some()
    }

    /// All entries whose key starts with the given prefix
    ///
    /// Results are sorted by path.
    #[must_use]
    pub fn lookup_prefix(&self, prefix: &str) -> Vec<TopicEntry> {
        let trie = self.trie.read();
        let mut entries: Vec<TopicEntry> = trie
            .get_raw_descendant(prefix)
            .map(|subtrie| subtrie.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    /// All entries whose final segment matches the given slug
    ///
    /// Finds a topic regardless of which section holds it.
    #[must_use]
    pub fn find_by_topic(&self, slug: &str) -> Vec<TopicEntry> {
        let trie = self.trie.read();
        let mut entries: Vec<TopicEntry> = trie
            .values()
            .filter(|entry| entry.path.topic() == Some(slug))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    /// All entries in a section, sorted by path
    #[must_use]
    pub fn section_topics(&self, section: &SectionName) -> Vec<TopicEntry> {
        let paths = match self.by_section.get(section) {
            Some(entry) => entry.value().clone(),
            None => return Vec::new(),
        };

        let mut entries: Vec<TopicEntry> =
            paths.iter().filter_map(|p| self.get(p)).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    /// Sections that hold at least one topic, in numeric order
    #[must_use]
    pub fn sections(&self) -> Vec<SectionName> {
        let mut sections: Vec<SectionName> =
            self.by_section.iter().map(|e| e.key().clone()).collect();
        sections.sort();
        sections
    }

    /// Get total topic count
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.read().len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TopicIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur on index operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Topic path already present in the index
    #[error("duplicate topic: {path}")]
    DuplicateTopic {
        /// The conflicting path
        path: TopicPath,
    },
}
