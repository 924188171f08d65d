//! Fulfils load events with providers.

use crate::event::{BrowserEvent, ContentRequest, ListingRequest};
use crate::model::TreeNode;
use crate::state::{CodeBrowserState, ListingTicket, LoadTicket};
use crate::traits::{ContentProvider, FileListProvider, ProviderError, TreeProvider};
use std::sync::Arc;

/// A provider answer for one load event, ready to be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult {
    Content(LoadTicket, Result<String, ProviderError>),
    PreviousContent(LoadTicket, Result<String, ProviderError>),
    Tree(ListingTicket, Result<TreeNode, ProviderError>),
    FileList(ListingTicket, Result<Vec<String>, ProviderError>),
}

impl CodeBrowserState {
    /// Apply a load result. Returns `false` if it was stale.
    pub fn apply(&mut self, result: LoadResult) -> bool {
        match result {
            LoadResult::Content(ticket, result) => self.apply_content(ticket, result),
            LoadResult::PreviousContent(ticket, result) => {
                self.apply_previous_content(ticket, result)
            }
            LoadResult::Tree(ticket, result) => self.apply_tree(ticket, result),
            LoadResult::FileList(ticket, result) => self.apply_file_list(ticket, result),
        }
    }
}

fn unavailable(what: &str) -> ProviderError {
    log::debug!("Skipping {} load, provider unavailable", what);
    ProviderError::Unavailable(format!("{} provider", what))
}

/// Runs provider calls for the `Load*` events emitted by the browser state.
///
/// The loader never holds the state across a provider call: [`fetch`]
/// only needs the event, so an embedding application can spawn it and apply
/// the result later, when newer actions may already have made it stale.
///
/// [`fetch`]: Loader::fetch
#[derive(Clone)]
pub struct Loader {
    tree: Arc<dyn TreeProvider>,
    files: Arc<dyn FileListProvider>,
    content: Arc<dyn ContentProvider>,
}

impl Loader {
    pub fn new(
        tree: Arc<dyn TreeProvider>,
        files: Arc<dyn FileListProvider>,
        content: Arc<dyn ContentProvider>,
    ) -> Self {
        Self {
            tree,
            files,
            content,
        }
    }

    /// Perform the provider call behind `event`.
    ///
    /// Providers reporting themselves unavailable are not called; the load
    /// resolves to [`ProviderError::Unavailable`]. Returns `None` for events
    /// that are not load requests.
    pub async fn fetch(&self, event: &BrowserEvent) -> Option<LoadResult> {
        let result = match event {
            BrowserEvent::LoadContent(request) => {
                LoadResult::Content(request.ticket.clone(), self.read(request).await)
            }
            BrowserEvent::LoadPreviousContent(request) => {
                LoadResult::PreviousContent(request.ticket.clone(), self.read(request).await)
            }
            BrowserEvent::LoadTree(request) => {
                LoadResult::Tree(request.ticket.clone(), self.list_tree(request).await)
            }
            BrowserEvent::LoadFileList(request) => {
                LoadResult::FileList(request.ticket.clone(), self.list_files(request).await)
            }
            _ => return None,
        };
        Some(result)
    }

    async fn read(&self, request: &ContentRequest) -> Result<String, ProviderError> {
        if !self.content.is_available() {
            return Err(unavailable("content"));
        }
        self.content
            .read_at_revision(&request.repo_root, &request.path, request.revision.as_ref())
            .await
    }

    async fn list_tree(&self, request: &ListingRequest) -> Result<TreeNode, ProviderError> {
        if !self.tree.is_available() {
            return Err(unavailable("tree"));
        }
        self.tree
            .list_tree(request.repo_root(), request.revision())
            .await
    }

    async fn list_files(&self, request: &ListingRequest) -> Result<Vec<String>, ProviderError> {
        if !self.files.is_available() {
            return Err(unavailable("file list"));
        }
        self.files
            .list_files(request.repo_root(), request.revision())
            .await
    }

    /// Fulfil every load in `events` and apply the results in order.
    ///
    /// Returns the remaining (notification) events for the caller.
    pub async fn run(
        &self,
        state: &mut CodeBrowserState,
        events: Vec<BrowserEvent>,
    ) -> Vec<BrowserEvent> {
        let mut notifications = Vec::new();
        for event in events {
            match self.fetch(&event).await {
                Some(result) => {
                    state.apply(result);
                }
                None => notifications.push(event),
            }
        }
        notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::BrowserAction;
    use crate::model::{Revision, TimeTravelState};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock repository answering every provider trait.
    struct MockRepo {
        files: Vec<&'static str>,
        reads: AtomicUsize,
        listings: AtomicUsize,
        available: bool,
    }

    impl MockRepo {
        fn new(files: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                files,
                reads: AtomicUsize::new(0),
                listings: AtomicUsize::new(0),
                available: true,
            })
        }

        fn offline(files: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                files,
                reads: AtomicUsize::new(0),
                listings: AtomicUsize::new(0),
                available: false,
            })
        }

        fn loader(self: &Arc<Self>) -> Loader {
            Loader::new(self.clone(), self.clone(), self.clone())
        }
    }

    #[async_trait]
    impl ContentProvider for MockRepo {
        async fn read_at_revision(
            &self,
            _repo_root: &str,
            path: &str,
            revision: Option<&Revision>,
        ) -> Result<String, ProviderError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if !self.files.iter().any(|f| *f == path) {
                return Err(ProviderError::NotFound(path.to_string()));
            }
            Ok(match revision {
                Some(rev) => format!("{} at {}", path, rev),
                None => format!("{} live", path),
            })
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[async_trait]
    impl TreeProvider for MockRepo {
        async fn list_tree(
            &self,
            _repo_root: &str,
            _revision: Option<&Revision>,
        ) -> Result<TreeNode, ProviderError> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            Ok(TreeNode::from_paths(&self.files))
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[async_trait]
    impl FileListProvider for MockRepo {
        async fn list_files(
            &self,
            _repo_root: &str,
            _revision: Option<&Revision>,
        ) -> Result<Vec<String>, ProviderError> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            Ok(self.files.iter().map(|f| f.to_string()).collect())
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[tokio::test]
    async fn test_run_loads_and_returns_notifications() {
        let repo = MockRepo::new(vec!["src/main.rs", "src/lib.rs"]);
        let loader = repo.loader();
        let mut state = CodeBrowserState::new("/repo");

        let events = state.handle_action(BrowserAction::FileClick("src/main.rs".into()));
        let notifications = loader.run(&mut state, events).await;

        assert!(notifications.iter().all(|e| !e.is_load()));
        assert_eq!(state.content("src/main.rs"), Some("src/main.rs live"));
        assert_eq!(state.quick_open_files().len(), 2);
        assert_eq!(state.siblings().len(), 2);
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
        assert_eq!(repo.listings.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unavailable_providers_are_not_called() {
        let repo = MockRepo::offline(vec!["a.rs"]);
        let loader = repo.loader();
        let mut state = CodeBrowserState::new("/repo");

        let events = state.handle_action(BrowserAction::FileDoubleClick("a.rs".into()));
        let load = events.iter().find(|e| e.is_load()).unwrap();
        assert!(matches!(
            loader.fetch(load).await,
            Some(LoadResult::Content(_, Err(ProviderError::Unavailable(_))))
                | Some(LoadResult::Tree(_, Err(ProviderError::Unavailable(_))))
                | Some(LoadResult::FileList(_, Err(ProviderError::Unavailable(_))))
        ));
        loader.run(&mut state, events).await;

        assert_eq!(repo.reads.load(Ordering::SeqCst), 0);
        assert_eq!(repo.listings.load(Ordering::SeqCst), 0);
        assert_eq!(state.content("a.rs"), Some(state.options().unavailable_placeholder.as_str()));
        assert!(state.quick_open_files().is_empty());
    }

    #[tokio::test]
    async fn test_reactivation_does_not_reload() {
        let repo = MockRepo::new(vec!["a.rs", "b.rs"]);
        let loader = repo.loader();
        let mut state = CodeBrowserState::new("/repo");

        for action in [
            BrowserAction::FileDoubleClick("a.rs".into()),
            BrowserAction::FileDoubleClick("b.rs".into()),
            BrowserAction::ActivateTab("a.rs".into()),
            BrowserAction::ActivateTab("b.rs".into()),
        ] {
            let events = state.handle_action(action);
            loader.run(&mut state, events).await;
        }
        assert_eq!(repo.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_snapshot_tab_gets_parent_baseline() {
        let repo = MockRepo::new(vec!["a.rs"]);
        let loader = repo.loader();
        let mut state = CodeBrowserState::new("/repo");

        let events = state.handle_action(BrowserAction::SyncTimeTravel(
            TimeTravelState::historical("abcdef12", None, None),
        ));
        loader.run(&mut state, events).await;
        let events = state.handle_action(BrowserAction::QuickOpenSelect("a.rs".into()));
        loader.run(&mut state, events).await;

        let props = state.editor_props().unwrap();
        assert_eq!(props.tab_id, "abcdef12:a.rs");
        assert_eq!(props.content, Some("a.rs at abcdef12"));
        assert_eq!(props.previous_content, Some("a.rs at abcdef12^"));
        assert!(props.has_diff_data);
    }

    #[tokio::test]
    async fn test_fetch_result_applied_after_close_is_stale() {
        let repo = MockRepo::new(vec!["a.rs"]);
        let loader = repo.loader();
        let mut state = CodeBrowserState::new("/repo");

        let events = state.handle_action(BrowserAction::FileDoubleClick("a.rs".into()));
        let load = events
            .iter()
            .find(|e| matches!(e, BrowserEvent::LoadContent(_)))
            .unwrap();
        let result = loader.fetch(load).await.unwrap();

        state.handle_action(BrowserAction::CloseTab("a.rs".into()));
        assert!(!state.apply(result));
        assert!(state.cache().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_becomes_placeholder() {
        let repo = MockRepo::new(vec![]);
        let loader = repo.loader();
        let mut state = CodeBrowserState::new("/repo");

        let events = state.handle_action(BrowserAction::FileDoubleClick("gone.rs".into()));
        loader.run(&mut state, events).await;
        assert_eq!(
            state.content("gone.rs"),
            Some(state.options().unavailable_placeholder.as_str())
        );
    }

    #[tokio::test]
    async fn test_fetch_ignores_notifications() {
        let loader = MockRepo::new(vec![]).loader();
        assert!(loader.fetch(&BrowserEvent::ReturnToLive).await.is_none());
    }
}
