//! Retrieval service over one opened bundle
//!
//! [`RetrievalService`] fronts the document store and the lookup index
//! with the operations hosts call: section listings, topic lookup,
//! ranked search, document fetch, and integrity verification. Every
//! operation runs under a fresh [`RequestId`] tracing span.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, debug_span, info, info_span, Instrument};

use skillpack_doc::{estimate_tokens, ContentHash, Document, TopicPath};
use skillpack_index::{IndexStats, LookupIndex};
use skillpack_store::{DocumentStore, IntegrityReport, StoreError};

use crate::config::RetrievalConfig;
use crate::error::{RetrievalError, RetrievalResult};
use crate::snippet::leading_matched_paragraph;
use crate::types::{Excerpt, RequestId, SectionSummary};

/// Retrieval operations over one skill bundle
///
/// Store and index are immutable after open; the service is safe to
/// share across concurrent readers.
pub struct RetrievalService {
    config: RetrievalConfig,
    store: DocumentStore,
    index: LookupIndex,
}

impl RetrievalService {
    /// Open a bundle and index every cataloged document
    ///
    /// # Errors
    /// Returns an error when the config is invalid, the bundle cannot
    /// be opened, or indexing hits a duplicate topic.
    pub async fn open(
        root: impl Into<PathBuf>,
        config: RetrievalConfig,
    ) -> RetrievalResult<Self> {
        config.validate()?;
        let store = DocumentStore::open(root, config.store).await?;
        let index = build_index(&store).await?;

        info!(
            root = %store.root().display(),
            documents = store.doc_count(),
            topics = index.len(),
            "retrieval service ready"
        );

        Ok(Self {
            config,
            store,
            index,
        })
    }

    /// Ordered summaries of the bundle's sections
    #[must_use]
    pub fn sections(&self) -> Vec<SectionSummary> {
        let request = RequestId::new();
        let _span = debug_span!("sections", %request).entered();

        let summaries: Vec<SectionSummary> = self
            .store
            .sections()
            .map(SectionSummary::from_section)
            .collect();
        debug!(sections = summaries.len(), "listed sections");
        summaries
    }

    /// Resolve a topic term to document paths
    ///
    /// Tries the topic index first (exact path, bare slug, prefix) and
    /// falls back to keyword search. A miss is an error, so callers
    /// can rely on getting at least one path back.
    ///
    /// # Errors
    /// Returns [`RetrievalError::EmptyQuery`] for blank terms and
    /// [`RetrievalError::UnknownTopic`] when nothing matches.
    pub fn lookup(&self, term: &str) -> RetrievalResult<Vec<TopicPath>> {
        let request = RequestId::new();
        let _span = debug_span!("lookup", %request, term).entered();

        if term.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        let entries = self.index.lookup(term);
        if !entries.is_empty() {
            let paths: Vec<TopicPath> = entries.into_iter().map(|e| e.path).collect();
            debug!(paths = paths.len(), "topic index resolved term");
            return Ok(paths);
        }

        let paths: Vec<TopicPath> = self
            .index
            .search(term, self.config.max_hits)
            .into_iter()
            .filter(|h| h.score >= self.config.min_score)
            .map(|h| h.path)
            .collect();
        if paths.is_empty() {
            return Err(RetrievalError::UnknownTopic {
                term: term.to_string(),
            });
        }
        debug!(paths = paths.len(), "keyword fallback resolved term");
        Ok(paths)
    }

    /// Search document text, returning ranked excerpts
    ///
    /// Hits below the minimum score are dropped; the rest are cut at
    /// the hit limit and the token budget. The best hit is always
    /// returned even when its snippet alone exceeds the budget.
    ///
    /// # Errors
    /// Returns [`RetrievalError::EmptyQuery`] for blank queries; store
    /// failures while reading hit documents propagate.
    pub async fn search(&self, query: &str) -> RetrievalResult<Vec<Excerpt>> {
        let request = RequestId::new();
        let span = debug_span!("search", %request, query);
        self.search_inner(query).instrument(span).await
    }

    async fn search_inner(&self, query: &str) -> RetrievalResult<Vec<Excerpt>> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        let hits = self.index.search(query, self.config.max_hits);
        let mut excerpts = Vec::new();
        let mut spent = 0usize;

        for hit in hits {
            if hit.score < self.config.min_score {
                // hits arrive sorted by descending score
                break;
            }
            let doc = self.store.fetch(&hit.path).await?;
            let snippet = leading_matched_paragraph(
                doc.text(),
                &hit.matched_keywords,
                self.config.snippet_max_chars,
            );
            let tokens = estimate_tokens(&snippet);
            if !excerpts.is_empty() && spent + tokens > self.config.token_budget {
                debug!(spent, budget = self.config.token_budget, "token budget reached");
                break;
            }
            spent += tokens;
            excerpts.push(Excerpt {
                path: hit.path,
                title: hit.title,
                score: hit.score,
                snippet,
                tokens,
            });
        }

        debug!(excerpts = excerpts.len(), spent, "search complete");
        Ok(excerpts)
    }

    /// Fetch the full document at a topic path
    ///
    /// # Errors
    /// Returns [`RetrievalError::UnknownPath`] when the path addresses
    /// no cataloged document; other store failures propagate.
    pub async fn fetch(&self, path: &TopicPath) -> RetrievalResult<Arc<Document>> {
        let request = RequestId::new();
        let span = debug_span!("fetch", %request, path = %path);
        async {
            match self.store.fetch(path).await {
                Ok(doc) => Ok(doc),
                Err(StoreError::UnknownTopic { topic }) => Err(RetrievalError::UnknownPath {
                    path: topic.to_string(),
                }),
                Err(e) => Err(e.into()),
            }
        }
        .instrument(span)
        .await
    }

    /// Fetch by path string, as hosts and the CLI pass it
    ///
    /// # Errors
    /// Returns [`RetrievalError::UnknownPath`] when the string is not
    /// a valid topic path or addresses no document.
    pub async fn fetch_str(&self, path: &str) -> RetrievalResult<Arc<Document>> {
        let parsed: TopicPath = path.parse().map_err(|_| RetrievalError::UnknownPath {
            path: path.to_string(),
        })?;
        self.fetch(&parsed).await
    }

    /// Run integrity checks over the opened bundle
    pub async fn verify(&self) -> IntegrityReport {
        let request = RequestId::new();
        let span = info_span!("verify", %request);
        self.store.verify().instrument(span).await
    }

    /// Merkle root over every cataloged document
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        let request = RequestId::new();
        let _span = debug_span!("fingerprint", %request).entered();
        self.store.fingerprint().root()
    }

    /// Configuration the service was opened with
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Underlying document store
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Number of cataloged documents
    #[inline]
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.store.doc_count()
    }

    /// Index statistics
    #[must_use]
    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }
}

// Store and index hold no Debug-friendly internals; summarize instead.
impl std::fmt::Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("root", &self.store.root())
            .field("documents", &self.store.doc_count())
            .field("topics", &self.index.len())
            .finish_non_exhaustive()
    }
}

/// Build the lookup index by fetching every cataloged document
async fn build_index(store: &DocumentStore) -> RetrievalResult<LookupIndex> {
    let topics: Vec<TopicPath> = store.records().map(|r| r.topic.clone()).collect();
    let mut index = LookupIndex::new();
    for topic in &topics {
        let doc = store.fetch(topic).await?;
        index.index_document(&doc)?;
    }
    debug!(topics = index.len(), "lookup index built");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillpack_test_utils::{minimal_bundle, typescript_bundle, FixtureBundle};

    async fn open_minimal() -> (FixtureBundle, RetrievalService) {
        let bundle = minimal_bundle().unwrap();
        let service = RetrievalService::open(bundle.root(), RetrievalConfig::default())
            .await
            .unwrap();
        (bundle, service)
    }

    #[tokio::test]
    async fn open_indexes_every_record() {
        let bundle = minimal_bundle().unwrap();
        let service = RetrievalService::open(bundle.root(), RetrievalConfig::default())
            .await
            .unwrap();
        assert_eq!(service.doc_count(), 3);
        assert_eq!(service.index_stats().topic_count, 3);
    }

    #[tokio::test]
    async fn open_rejects_invalid_config() {
        let bundle = minimal_bundle().unwrap();
        let config = RetrievalConfig::default().with_max_hits(0);
        let err = RetrievalService::open(bundle.root(), config)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Config(_)));
    }

    #[tokio::test]
    async fn service_debug_summarizes_bundle() {
        let (_bundle, service) = open_minimal().await;
        let rendered = format!("{service:?}");
        assert!(rendered.starts_with("RetrievalService"));
        assert!(rendered.contains("documents: 3"));
    }

    #[tokio::test]
    async fn sections_are_ordered() {
        let (_bundle, service) = open_minimal().await;
        let sections = service.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].number, 1);
        assert_eq!(sections[0].slug, "getting-started");
        assert_eq!(sections[1].number, 2);
        assert_eq!(sections[1].doc_count, 2);
    }

    #[tokio::test]
    async fn lookup_exact_and_slug() {
        let (_bundle, service) = open_minimal().await;

        let paths = service.lookup("02-handbook/narrowing").unwrap();
        assert_eq!(paths.len(), 1);

        let paths = service.lookup("generics").unwrap();
        assert_eq!(paths[0].to_string(), "02-handbook/generics");
    }

    #[tokio::test]
    async fn lookup_rejects_empty_and_unknown() {
        let (_bundle, service) = open_minimal().await;
        assert!(matches!(
            service.lookup("   "),
            Err(RetrievalError::EmptyQuery)
        ));
        assert!(matches!(
            service.lookup("quaternions"),
            Err(RetrievalError::UnknownTopic { .. })
        ));
    }

    #[tokio::test]
    async fn search_returns_scored_excerpts() {
        let bundle = typescript_bundle().unwrap();
        let service = RetrievalService::open(bundle.root(), RetrievalConfig::default())
            .await
            .unwrap();

        let excerpts = service.search("narrowing").await.unwrap();
        assert!(!excerpts.is_empty());
        assert_eq!(excerpts[0].path.to_string(), "02-handbook/narrowing");
        assert!(excerpts[0].score > 0.0);
        assert!(!excerpts[0].snippet.is_empty());
        assert_eq!(excerpts[0].tokens, estimate_tokens(&excerpts[0].snippet));
    }

    #[tokio::test]
    async fn search_respects_hit_limit() {
        let bundle = typescript_bundle().unwrap();
        let config = RetrievalConfig::default().with_max_hits(2).with_min_score(0.0);
        let service = RetrievalService::open(bundle.root(), config).await.unwrap();

        let excerpts = service.search("types").await.unwrap();
        assert!(excerpts.len() <= 2);
    }

    #[tokio::test]
    async fn search_respects_token_budget() {
        let bundle = typescript_bundle().unwrap();
        let config = RetrievalConfig::default().with_token_budget(1);
        let service = RetrievalService::open(bundle.root(), config).await.unwrap();

        // the best hit survives even though it alone exceeds the budget
        let excerpts = service.search("types").await.unwrap();
        assert_eq!(excerpts.len(), 1);
    }

    #[tokio::test]
    async fn search_rejects_empty_query() {
        let (_bundle, service) = open_minimal().await;
        assert!(matches!(
            service.search("").await,
            Err(RetrievalError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn fetch_and_fetch_str() {
        let (_bundle, service) = open_minimal().await;

        let path: TopicPath = "02-handbook/narrowing".parse().unwrap();
        let doc = service.fetch(&path).await.unwrap();
        assert!(doc.verify());

        let same = service.fetch_str("02-handbook/narrowing").await.unwrap();
        assert_eq!(doc.hash(), same.hash());
    }

    #[tokio::test]
    async fn fetch_unknown_paths() {
        let (_bundle, service) = open_minimal().await;

        assert!(matches!(
            service.fetch_str("02-handbook/missing").await,
            Err(RetrievalError::UnknownPath { .. })
        ));
        // not even a parseable topic path
        assert!(matches!(
            service.fetch_str("NOT A PATH").await,
            Err(RetrievalError::UnknownPath { .. })
        ));
    }

    #[tokio::test]
    async fn verify_and_fingerprint() {
        let (_bundle, service) = open_minimal().await;

        let report = service.verify().await;
        assert!(report.is_ok());

        let root = service.fingerprint();
        assert!(!root.is_zero());
        assert_eq!(root, service.store().fingerprint().root());
    }
}
