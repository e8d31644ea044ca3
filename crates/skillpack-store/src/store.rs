//! Read-only document store over a bundle directory
//!
//! [`DocumentStore::open`] scans the bundle once and keeps only the
//! catalog; document bodies are re-read on demand through the cache.
//! The store is the only component that touches the filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use skillpack_doc::{BundleFingerprint, Document, Section, TopicPath};

use crate::cache::{CacheStats, DocumentCache};
use crate::catalog::{Catalog, DocumentRecord};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::integrity::{self, IntegrityReport};
use crate::loader::{self, LoadIssue, REFERENCES_DIR};
use crate::manifest::{BundleLayout, SkillManifest};

/// Read-only store over one skill bundle
///
/// Catalog and sections are immutable after open; concurrent readers
/// share the store freely.
#[derive(Debug)]
pub struct DocumentStore {
    root: PathBuf,
    config: StoreConfig,
    layout: BundleLayout,
    manifest: Option<SkillManifest>,
    catalog: Catalog,
    issues: Vec<LoadIssue>,
    cache: DocumentCache,
}

impl DocumentStore {
    /// Open a bundle, scanning `references/` and building the catalog
    ///
    /// Per-file problems are recorded as load issues rather than
    /// failing the open; see [`DocumentStore::load_issues`].
    ///
    /// # Errors
    /// Returns an error when the root is missing, is not a directory,
    /// or `references/` exists but cannot be listed.
    pub async fn open(root: impl Into<PathBuf>, config: StoreConfig) -> StoreResult<Self> {
        let root = root.into();
        let meta = tokio::fs::metadata(&root)
            .await
            .map_err(|e| StoreError::io_error(&root, e))?;
        if !meta.is_dir() {
            return Err(StoreError::NotADirectory { root });
        }

        let outcome = loader::load_bundle(&root, &config).await?;
        let cache = match config.cache_ttl() {
            Some(ttl) => DocumentCache::with_ttl(config.cache_capacity, ttl),
            None => DocumentCache::new(config.cache_capacity),
        };

        info!(
            root = %root.display(),
            documents = outcome.catalog.doc_count(),
            sections = outcome.catalog.section_names().count(),
            issues = outcome.issues.len(),
            "opened bundle"
        );

        Ok(Self {
            root,
            config,
            layout: BundleLayout::default(),
            manifest: outcome.manifest,
            catalog: outcome.catalog,
            issues: outcome.issues,
            cache,
        })
    }

    /// Replace the expected layout used by [`DocumentStore::verify`]
    #[must_use]
    pub fn with_layout(mut self, layout: BundleLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Bundle root path
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration the store was opened with
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Expected section layout
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> &BundleLayout {
        &self.layout
    }

    /// Parsed manifest, when SKILL.md was present and valid
    #[inline]
    #[must_use]
    pub const fn manifest(&self) -> Option<&SkillManifest> {
        self.manifest.as_ref()
    }

    /// Catalog built at open time
    #[inline]
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Problems recorded while loading
    #[inline]
    #[must_use]
    pub fn load_issues(&self) -> &[LoadIssue] {
        &self.issues
    }

    /// Sections in numeric order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.catalog.sections()
    }

    /// All document records in section order
    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.catalog.records()
    }

    /// Record for a topic
    #[must_use]
    pub fn record(&self, topic: &TopicPath) -> Option<&DocumentRecord> {
        self.catalog.record(topic)
    }

    /// Merkle fingerprint over the cataloged document hashes
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> &BundleFingerprint {
        self.catalog.fingerprint()
    }

    /// Number of cataloged documents
    #[inline]
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.catalog.doc_count()
    }

    /// Absolute path of a references-relative document path
    #[must_use]
    pub fn doc_path(&self, rel: &Path) -> PathBuf {
        self.root.join(REFERENCES_DIR).join(rel)
    }

    /// Document cache statistics
    #[inline]
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Fetch a document body, re-reading from disk through the cache
    ///
    /// The fetched bytes must hash to the value recorded in the
    /// catalog; documents are immutable at runtime, so drift is an
    /// integrity error.
    ///
    /// # Errors
    /// Returns an error when the topic is not cataloged, the file
    /// cannot be read, or the content no longer matches the catalog.
    pub async fn fetch(&self, topic: &TopicPath) -> StoreResult<Arc<Document>> {
        let record = self
            .catalog
            .record(topic)
            .ok_or_else(|| StoreError::UnknownTopic {
                topic: topic.clone(),
            })?;

        let rel = record.rel_path.clone();
        let expected = record.hash;
        let section = record.section.clone();
        let abs = self.doc_path(&rel);
        let limit = self.config.max_file_size;
        let load_topic = topic.clone();
        let load_rel = rel.clone();

        self.cache
            .try_get_or_insert_with(rel, || async move {
                debug!(topic = %load_topic, "reading document from disk");
                let text = tokio::fs::read_to_string(&abs)
                    .await
                    .map_err(|e| StoreError::io_error(&abs, e))?;
                let size = text.len() as u64;
                if size > limit {
                    return Err(StoreError::FileTooLarge {
                        path: load_rel,
                        size,
                        limit,
                    });
                }
                let document = Document::new(load_topic, section, text)?;
                if *document.hash() != expected {
                    return Err(StoreError::HashMismatch {
                        path: load_rel,
                        expected,
                        actual: *document.hash(),
                    });
                }
                Ok(Arc::new(document))
            })
            .await
            // The sole fetcher gets its error back by value; coalesced
            // waiters share it through the Arc.
            .map_err(|e| Arc::try_unwrap(e).unwrap_or_else(StoreError::Shared))
    }

    /// Run the full integrity pass over this bundle
    pub async fn verify(&self) -> IntegrityReport {
        integrity::check_store(self).await
    }
}
