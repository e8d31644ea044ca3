//! Document cache using moka
//!
//! Fetched documents are cached by their references-relative path so
//! repeated reads of hot topics skip the filesystem.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use skillpack_doc::Document;

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Path-addressed document cache
///
/// Values are `Arc<Document>` so hits clone a pointer, not a body.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    inner: Cache<PathBuf, Arc<Document>>,
}

impl DocumentCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Insert document into cache
    #[inline]
    pub async fn insert(&self, rel_path: PathBuf, document: Arc<Document>) {
        self.inner.insert(rel_path, document).await;
    }

    /// Get document from cache
    #[inline]
    #[must_use]
    pub async fn get(&self, rel_path: &Path) -> Option<Arc<Document>> {
        self.inner.get(rel_path).await
    }

    /// Get cached document or load it, propagating load errors
    ///
    /// Concurrent cold calls for the same path share a single load;
    /// waiters receive the loader's error behind an `Arc`. A failed
    /// load caches nothing.
    ///
    /// # Errors
    /// Returns whatever error the loader produced.
    pub async fn try_get_or_insert_with<E, F, Fut>(
        &self,
        rel_path: PathBuf,
        load: F,
    ) -> Result<Arc<Document>, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<Document>, E>>,
        E: Send + Sync + 'static,
    {
        self.inner.try_get_with(rel_path, load()).await
    }

    /// Invalidate cache entry
    #[inline]
    pub async fn invalidate(&self, rel_path: &Path) {
        self.inner.invalidate(rel_path).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Check if cache contains a path
    #[inline]
    #[must_use]
    pub async fn contains(&self, rel_path: &Path) -> bool {
        self.inner.get(rel_path).await.is_some()
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillpack_doc::{SectionName, TopicPath};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_document(topic: &str, text: &str) -> Arc<Document> {
        let path: TopicPath = topic.parse().unwrap();
        let section: SectionName = path.section_dir().unwrap().parse().unwrap();
        Arc::new(Document::new(path, section, text.to_string()).unwrap())
    }

    #[tokio::test]
    async fn cache_insert_and_get() {
        let cache = DocumentCache::new(100);
        let doc = make_document("02-handbook/narrowing", "# Narrowing\n\nGuards.\n");
        let rel = PathBuf::from("02-handbook/narrowing.md");

        cache.insert(rel.clone(), Arc::clone(&doc)).await;

        let hit = cache.get(&rel).await.unwrap();
        assert_eq!(hit.hash(), doc.hash());
    }

    #[tokio::test]
    async fn cache_returns_none_for_missing() {
        let cache = DocumentCache::new(100);
        assert!(cache.get(Path::new("02-handbook/absent.md")).await.is_none());
    }

    #[tokio::test]
    async fn cache_try_get_or_insert_loads_once() {
        let cache = DocumentCache::new(100);
        let rel = PathBuf::from("02-handbook/generics.md");
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let doc = cache
            .try_get_or_insert_with(rel.clone(), || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(make_document(
                    "02-handbook/generics",
                    "# Generics\n\nTypes.\n",
                ))
            })
            .await;
        assert!(doc.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let calls_clone = Arc::clone(&calls);
        let cached: Result<_, Arc<std::io::Error>> = cache
            .try_get_or_insert_with(rel, || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                unreachable!("should use cached value")
            })
            .await;
        assert!(cached.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_coalesces_concurrent_loads() {
        let cache = DocumentCache::new(100);
        let rel = PathBuf::from("02-handbook/narrowing.md");
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = |calls: Arc<AtomicUsize>| {
            let cache = cache.clone();
            let rel = rel.clone();
            async move {
                cache
                    .try_get_or_insert_with(rel, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, std::io::Error>(make_document(
                            "02-handbook/narrowing",
                            "# Narrowing\n\nGuards.\n",
                        ))
                    })
                    .await
            }
        };

        let (a, b) = tokio::join!(fetch(Arc::clone(&calls)), fetch(Arc::clone(&calls)));
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_error_caches_nothing() {
        let cache = DocumentCache::new(100);
        let rel = PathBuf::from("02-handbook/broken.md");

        let result: Result<Arc<Document>, Arc<&str>> = cache
            .try_get_or_insert_with(rel.clone(), || async { Err("load failed") })
            .await;
        assert!(result.is_err());
        assert!(!cache.contains(&rel).await);
    }

    #[tokio::test]
    async fn cache_invalidation() {
        let cache = DocumentCache::new(100);
        let doc = make_document("02-handbook/classes", "# Classes\n\nFields.\n");
        let rel = PathBuf::from("02-handbook/classes.md");

        cache.insert(rel.clone(), doc).await;
        assert!(cache.contains(&rel).await);

        cache.invalidate(&rel).await;
        assert!(!cache.contains(&rel).await);
    }

    #[tokio::test]
    async fn cache_stats() {
        let cache = DocumentCache::new(100);
        for i in 0..3 {
            let doc = make_document("02-handbook/narrowing", "# Narrowing\n\nGuards.\n");
            cache
                .insert(PathBuf::from(format!("02-handbook/doc{i}.md")), doc)
                .await;
        }
        // moka counts are eventually consistent; sync before reading
        cache.inner.run_pending_tasks().await;
        assert_eq!(cache.stats().entry_count, 3);
    }
}
