//! Per-tab content cache with lazy, at-most-once loading.

use crate::model::{Revision, TabId};
use crate::traits::{ContentProvider, ProviderError};
use log::{debug, warn};
use std::collections::HashMap;

/// A resolved cache slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedContent {
    /// Text returned by the provider.
    Loaded(String),
    /// The provider failed; the slot stays filled so the load is not retried.
    Unavailable,
}

impl CachedContent {
    /// The loaded text, `None` for the unavailable sentinel.
    pub fn text(&self) -> Option<&str> {
        match self {
            CachedContent::Loaded(text) => Some(text.as_str()),
            CachedContent::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, CachedContent::Unavailable)
    }

    /// Text to show, substituting `placeholder` for the sentinel.
    pub fn display<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.text().unwrap_or(placeholder)
    }
}

/// Handle for one in-flight load, issued by `begin_load`.
///
/// A result is only applied if its ticket is still the latest one issued for
/// the tab id; closing or invalidating the tab makes it stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub tab_id: TabId,
    generation: u64,
}

/// In-flight bookkeeping keyed by tab id.
#[derive(Debug, Clone, Default)]
pub(crate) struct InFlight {
    pending: HashMap<TabId, u64>,
    next_generation: u64,
}

impl InFlight {
    pub(crate) fn is_pending(&self, tab_id: &str) -> bool {
        self.pending.contains_key(tab_id)
    }

    /// Issue a ticket unless a load for `tab_id` is already pending.
    pub(crate) fn begin(&mut self, tab_id: &TabId) -> Option<LoadTicket> {
        if self.is_pending(tab_id.as_str()) {
            return None;
        }
        self.next_generation += 1;
        self.pending.insert(tab_id.clone(), self.next_generation);
        Some(LoadTicket {
            tab_id: tab_id.clone(),
            generation: self.next_generation,
        })
    }

    /// Retire `ticket`. Returns `false` if it was stale.
    pub(crate) fn finish(&mut self, ticket: &LoadTicket) -> bool {
        match self.pending.get(ticket.tab_id.as_str()) {
            Some(&generation) if generation == ticket.generation => {
                self.pending.remove(ticket.tab_id.as_str());
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel(&mut self, tab_id: &str) {
        self.pending.remove(tab_id);
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Loaded text per tab id.
///
/// Slots are keyed by tab id, not by (path, revision): two tabs showing the
/// same file at the same revision load independently, so closing one can
/// simply drop its slot. A filled slot is never overwritten; it is only
/// removed explicitly (close, preview replacement, snapshot exit).
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    entries: HashMap<TabId, CachedContent>,
    in_flight: InFlight,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tab_id: &str) -> Option<&CachedContent> {
        self.entries.get(tab_id)
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.entries.contains_key(tab_id)
    }

    /// Whether a load for `tab_id` has been issued and not yet completed.
    pub fn is_loading(&self, tab_id: &str) -> bool {
        self.in_flight.is_pending(tab_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start a load for `tab_id`.
    ///
    /// Returns `None` when the slot is already filled or a load is in flight.
    pub fn begin_load(&mut self, tab_id: &TabId) -> Option<LoadTicket> {
        if self.contains(tab_id.as_str()) {
            debug!("Cache HIT for tab {}", tab_id);
            return None;
        }
        self.in_flight.begin(tab_id)
    }

    /// Apply the provider result for `ticket`.
    ///
    /// Errors are stored as [`CachedContent::Unavailable`]. Returns `false`
    /// when the ticket is stale (the tab was closed or invalidated meanwhile)
    /// and the result was discarded.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<String, ProviderError>) -> bool {
        if !self.in_flight.finish(&ticket) {
            debug!("Discarding stale content load for tab {}", ticket.tab_id);
            return false;
        }

        let entry = match result {
            Ok(text) => CachedContent::Loaded(text),
            Err(e) => {
                warn!("Content for tab {} unavailable: {}", ticket.tab_id, e);
                CachedContent::Unavailable
            }
        };
        self.entries.entry(ticket.tab_id).or_insert(entry);
        true
    }

    /// Drop the slot for `tab_id` and invalidate any load in flight for it.
    pub fn remove(&mut self, tab_id: &str) -> Option<CachedContent> {
        self.in_flight.cancel(tab_id);
        self.entries.remove(tab_id)
    }

    pub fn clear(&mut self) {
        self.in_flight.clear();
        self.entries.clear();
    }

    /// Resolve the content for `tab_id`, loading it through `provider` on a
    /// cache miss.
    ///
    /// Returns `None` only when another load for the same tab is already in
    /// flight.
    pub async fn load_content(
        &mut self,
        provider: &dyn ContentProvider,
        repo_root: &str,
        tab_id: &TabId,
        path: &str,
        revision: Option<&Revision>,
    ) -> Option<CachedContent> {
        if let Some(entry) = self.get(tab_id.as_str()) {
            debug!("Cache HIT for tab {}", tab_id);
            return Some(entry.clone());
        }

        let ticket = self.begin_load(tab_id)?;
        let result = provider.read_at_revision(repo_root, path, revision).await;
        self.complete(ticket, result);
        self.get(tab_id.as_str()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentProvider for CountingProvider {
        async fn read_at_revision(
            &self,
            _repo_root: &str,
            path: &str,
            revision: Option<&Revision>,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Io("boom".to_string()));
            }
            Ok(match revision {
                Some(rev) => format!("{}@{}", path, rev),
                None => format!("{}@live", path),
            })
        }
    }

    fn id(path: &str) -> TabId {
        TabId::derive(path, None)
    }

    #[tokio::test]
    async fn test_load_content_loads_once() {
        let provider = CountingProvider::new(false);
        let mut cache = ContentCache::new();

        let first = cache
            .load_content(&provider, "/repo", &id("a.rs"), "a.rs", None)
            .await;
        assert_eq!(first, Some(CachedContent::Loaded("a.rs@live".to_string())));

        let second = cache
            .load_content(&provider, "/repo", &id("a.rs"), "a.rs", None)
            .await;
        assert_eq!(second, first);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_caches_unavailable_and_does_not_retry() {
        let provider = CountingProvider::new(true);
        let mut cache = ContentCache::new();

        let result = cache
            .load_content(&provider, "/repo", &id("a.rs"), "a.rs", None)
            .await;
        assert_eq!(result, Some(CachedContent::Unavailable));
        assert_eq!(result.unwrap().display("(unavailable)"), "(unavailable)");

        cache
            .load_content(&provider, "/repo", &id("a.rs"), "a.rs", None)
            .await;
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_same_file_in_two_tabs_has_independent_slots() {
        let provider = CountingProvider::new(false);
        let mut cache = ContentCache::new();
        let rev = Revision::parse("abc1234").unwrap();
        let pinned = TabId::derive("a.rs", Some(&rev));

        cache
            .load_content(&provider, "/repo", &id("a.rs"), "a.rs", None)
            .await;
        cache
            .load_content(&provider, "/repo", &pinned, "a.rs", Some(&rev))
            .await;
        assert_eq!(provider.calls(), 2);

        cache.remove(pinned.as_str());
        assert_eq!(
            cache.get("a.rs"),
            Some(&CachedContent::Loaded("a.rs@live".to_string()))
        );
    }

    #[test]
    fn test_begin_load_guards_duplicates() {
        let mut cache = ContentCache::new();
        let ticket = cache.begin_load(&id("a.rs")).unwrap();
        assert!(cache.is_loading("a.rs"));
        assert!(cache.begin_load(&id("a.rs")).is_none());

        assert!(cache.complete(ticket, Ok("text".to_string())));
        assert!(!cache.is_loading("a.rs"));
        assert!(cache.begin_load(&id("a.rs")).is_none());
    }

    #[test]
    fn test_result_for_removed_tab_is_discarded() {
        let mut cache = ContentCache::new();
        let stale = cache.begin_load(&id("a.rs")).unwrap();

        cache.remove("a.rs");
        let fresh = cache.begin_load(&id("a.rs")).unwrap();

        assert!(!cache.complete(stale, Ok("old".to_string())));
        assert!(cache.get("a.rs").is_none());

        assert!(cache.complete(fresh, Ok("new".to_string())));
        assert_eq!(cache.get("a.rs").unwrap().text(), Some("new"));
    }

    #[test]
    fn test_close_then_late_result_does_not_resurrect_slot() {
        let mut cache = ContentCache::new();
        let ticket = cache.begin_load(&id("a.rs")).unwrap();
        cache.remove("a.rs");

        assert!(!cache.complete(ticket, Ok("late".to_string())));
        assert!(cache.is_empty());
    }
}
