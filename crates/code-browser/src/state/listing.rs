//! Tree and file-list results with staleness suppression.

use crate::model::Revision;
use crate::traits::ProviderError;
use log::{debug, warn};

/// Dependency identity of a listing query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub repo_root: String,
    pub revision: Option<Revision>,
}

impl QueryKey {
    pub fn new(repo_root: impl Into<String>, revision: Option<Revision>) -> Self {
        Self {
            repo_root: repo_root.into(),
            revision,
        }
    }
}

/// Handle for one issued listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTicket {
    pub key: QueryKey,
    generation: u64,
}

/// The latest applied result of a listing query.
///
/// Results are applied only if they answer the most recently issued query
/// and that query's key is still current; anything else self-suppresses.
/// Failures reset the value to empty.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    value: T,
    current_key: Option<QueryKey>,
    latest_generation: u64,
    loaded: bool,
    what: &'static str,
}

impl<T: Default> Listing<T> {
    pub fn new(what: &'static str) -> Self {
        Self {
            value: T::default(),
            current_key: None,
            latest_generation: 0,
            loaded: false,
            what,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Whether the value answers the current key.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Issue a query for `key` unless it is already current.
    pub fn issue(&mut self, key: QueryKey) -> Option<ListingTicket> {
        if self.current_key.as_ref() == Some(&key) {
            return None;
        }
        Some(self.reissue(key))
    }

    /// Issue a query for `key` even if it is already current.
    pub fn reissue(&mut self, key: QueryKey) -> ListingTicket {
        self.latest_generation += 1;
        self.current_key = Some(key.clone());
        self.loaded = false;
        ListingTicket {
            key,
            generation: self.latest_generation,
        }
    }

    /// Apply a provider result. Returns `false` if the ticket was stale.
    pub fn apply(&mut self, ticket: ListingTicket, result: Result<T, ProviderError>) -> bool {
        let is_current = self.current_key.as_ref() == Some(&ticket.key)
            && ticket.generation == self.latest_generation;
        if !is_current {
            debug!(
                "Discarding stale {} for {:?} (generation {}, latest {})",
                self.what, ticket.key.revision, ticket.generation, self.latest_generation
            );
            return false;
        }

        self.value = match result {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to load {}: {}", self.what, e);
                T::default()
            }
        };
        self.loaded = true;
        true
    }

    /// Forget the key and value.
    pub fn reset(&mut self) {
        self.value = T::default();
        self.current_key = None;
        self.loaded = false;
        self.latest_generation += 1;
    }
}
