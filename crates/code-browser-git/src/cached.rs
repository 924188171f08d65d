//! Memoizing provider (decorator pattern)
//!
//! Wraps any provider to remember historical answers. A commit never
//! changes, so results at a revision can be reused for as long as the
//! decorator lives; live (working tree) queries always pass through.

use async_trait::async_trait;
use code_browser::{
    ContentProvider, FileListProvider, ProviderError, Revision, TreeNode, TreeProvider,
};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Historical results keyed by repository root and revision.
#[derive(Debug, Default)]
struct HistoricalCache {
    trees: HashMap<(String, String), TreeNode>,
    files: HashMap<(String, String), Vec<String>>,
    contents: HashMap<(String, String, String), String>,
}

/// Cache statistics for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub trees: usize,
    pub file_lists: usize,
    pub contents: usize,
}

/// Provider decorator that memoizes successful historical results.
///
/// Failures are never cached, so a later query can still succeed (e.g. after
/// a fetch made the commit available).
#[derive(Debug, Clone)]
pub struct CachedProvider<P> {
    inner: P,
    cache: Arc<Mutex<HistoricalCache>>,
}

impl<P> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Arc::new(Mutex::new(HistoricalCache::default())),
        }
    }

    /// Get a reference to the inner provider
    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn with_cache<R>(&self, f: impl FnOnce(&mut HistoricalCache) -> R) -> R {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cache)
    }

    pub fn stats(&self) -> CacheStats {
        self.with_cache(|cache| CacheStats {
            trees: cache.trees.len(),
            file_lists: cache.files.len(),
            contents: cache.contents.len(),
        })
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.with_cache(|cache| *cache = HistoricalCache::default());
    }
}

fn listing_key(repo_root: &str, rev: &Revision) -> (String, String) {
    (repo_root.to_string(), rev.as_str().to_string())
}

#[async_trait]
impl<P: TreeProvider> TreeProvider for CachedProvider<P> {
    async fn list_tree(
        &self,
        repo_root: &str,
        revision: Option<&Revision>,
    ) -> Result<TreeNode, ProviderError> {
        let Some(rev) = revision else {
            return self.inner.list_tree(repo_root, None).await;
        };

        let key = listing_key(repo_root, rev);
        if let Some(tree) = self.with_cache(|cache| cache.trees.get(&key).cloned()) {
            debug!("Cache HIT for tree at {}", rev.short());
            return Ok(tree);
        }

        let tree = self.inner.list_tree(repo_root, Some(rev)).await?;
        self.with_cache(|cache| cache.trees.insert(key, tree.clone()));
        Ok(tree)
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}

#[async_trait]
impl<P: FileListProvider> FileListProvider for CachedProvider<P> {
    async fn list_files(
        &self,
        repo_root: &str,
        revision: Option<&Revision>,
    ) -> Result<Vec<String>, ProviderError> {
        let Some(rev) = revision else {
            return self.inner.list_files(repo_root, None).await;
        };

        let key = listing_key(repo_root, rev);
        if let Some(files) = self.with_cache(|cache| cache.files.get(&key).cloned()) {
            debug!("Cache HIT for file list at {}: {} files", rev.short(), files.len());
            return Ok(files);
        }

        let files = self.inner.list_files(repo_root, Some(rev)).await?;
        self.with_cache(|cache| cache.files.insert(key, files.clone()));
        Ok(files)
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}

#[async_trait]
impl<P: ContentProvider> ContentProvider for CachedProvider<P> {
    async fn read_at_revision(
        &self,
        repo_root: &str,
        path: &str,
        revision: Option<&Revision>,
    ) -> Result<String, ProviderError> {
        let Some(rev) = revision else {
            return self.inner.read_at_revision(repo_root, path, None).await;
        };

        let key = (
            repo_root.to_string(),
            rev.as_str().to_string(),
            path.to_string(),
        );
        if let Some(text) = self.with_cache(|cache| cache.contents.get(&key).cloned()) {
            debug!("Cache HIT for {} at {}", path, rev.short());
            return Ok(text);
        }

        let text = self.inner.read_at_revision(repo_root, path, Some(rev)).await?;
        self.with_cache(|cache| cache.contents.insert(key, text.clone()));
        Ok(text)
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}
