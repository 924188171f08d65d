//! Main state for the code browser panel.

use super::{
    CachedContent, ContentCache, DiffBaseline, InFlight, Listing, ListingTicket, LoadTicket,
    OpenKind, PanelBaseline, QueryKey, RevisionContext, SnapshotBanner, SnapshotCoordinator,
    SnapshotExit, TabRegistry,
};
use crate::action::BrowserAction;
use crate::event::{BrowserEvent, ContentRequest, ListingRequest};
use crate::model::{
    breadcrumbs, FlatTreeEntry, OpenOptions, SiblingEntry, Tab, TabId, TreeNode, ViewState,
};
use crate::traits::ProviderError;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Tunables for the browser state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Text shown in place of content that failed to load.
    pub unavailable_placeholder: String,
    /// Load the parent-commit version of pinned files as their diff baseline.
    pub load_parent_baseline: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            unavailable_placeholder: "// Unable to load file content".to_string(),
            load_parent_baseline: true,
        }
    }
}

/// What the embedded editor widget needs for the active tab.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorProps<'a> {
    pub tab_id: &'a TabId,
    pub path: &'a str,
    /// Text to show; `None` while the content is still loading.
    pub content: Option<&'a str>,
    pub previous_content: Option<&'a str>,
    pub view_state: Option<&'a ViewState>,
    pub has_diff_data: bool,
}

/// Owns every piece of code browser state.
///
/// Feed it [`BrowserAction`]s through [`handle_action`](Self::handle_action),
/// fulfil the `Load*` events it returns and hand the results back through the
/// `apply_*` methods. Only the active tab loads content.
#[derive(Debug, Clone)]
pub struct CodeBrowserState {
    repo_root: String,
    registry: TabRegistry,
    cache: ContentCache,
    /// Parent-commit baseline loads in flight.
    baselines: InFlight,
    /// Tabs whose baseline load finished, successfully or not.
    baselines_resolved: HashSet<TabId>,
    snapshot: SnapshotCoordinator,
    panel_baseline: PanelBaseline,
    tree: Listing<TreeNode>,
    files: Listing<Vec<String>>,
    expanded_dirs: HashSet<String>,
    options: BrowserOptions,
}

impl CodeBrowserState {
    pub fn new(repo_root: impl Into<String>) -> Self {
        Self::with_options(repo_root, BrowserOptions::default())
    }

    pub fn with_options(repo_root: impl Into<String>, options: BrowserOptions) -> Self {
        Self {
            repo_root: repo_root.into(),
            registry: TabRegistry::new(),
            cache: ContentCache::new(),
            baselines: InFlight::default(),
            baselines_resolved: HashSet::new(),
            snapshot: SnapshotCoordinator::new(),
            panel_baseline: PanelBaseline::default(),
            tree: Listing::new("tree"),
            files: Listing::new("file list"),
            expanded_dirs: HashSet::new(),
            options,
        }
    }

    /// Handle an action, returning any resulting events.
    ///
    /// Besides the action's own events, this reports an active-tab change
    /// (with the view state to restore), requests content for the active tab
    /// if it has none, and requests the tree and file list whenever the repo
    /// root or effective revision changed.
    pub fn handle_action(&mut self, action: BrowserAction) -> Vec<BrowserEvent> {
        let previous_active = self.registry.active_id().cloned();
        let mut events = Vec::new();
        let mut force_refresh = false;

        match action {
            BrowserAction::FileClick(path) => {
                self.open_at_effective_revision(&path, true, &mut events);
            }
            BrowserAction::FileDoubleClick(path) | BrowserAction::QuickOpenSelect(path) => {
                self.open_at_effective_revision(&path, false, &mut events);
            }
            BrowserAction::BreadcrumbNavigate(path) => {
                self.navigate_breadcrumb(&path, &mut events);
            }
            BrowserAction::OpenTab { path, options } => {
                self.open(&path, options, &mut events);
            }

            BrowserAction::ActivateTab(id) => {
                if !self.registry.set_active_tab(&id) {
                    debug!("Ignoring activation of unknown tab {}", id);
                }
            }
            BrowserAction::NextTab => {
                self.registry.activate_next();
            }
            BrowserAction::PrevTab => {
                self.registry.activate_previous();
            }
            BrowserAction::CloseTab(id) => {
                if let Some(tab) = self.registry.close_tab(&id) {
                    self.forget_tab(tab.id, &mut events);
                }
            }
            BrowserAction::CloseAllTabs => {
                for tab in self.registry.close_all_tabs() {
                    self.forget_tab(tab.id, &mut events);
                }
            }
            BrowserAction::CloseOtherTabs(id) => {
                for tab in self.registry.close_other_tabs(&id) {
                    self.forget_tab(tab.id, &mut events);
                }
            }
            BrowserAction::CloseTabsToRight(id) => {
                for tab in self.registry.close_tabs_to_right(&id) {
                    self.forget_tab(tab.id, &mut events);
                }
            }
            BrowserAction::ExitSnapshot(id) => {
                match self.registry.exit_snapshot(&id) {
                    Some(SnapshotExit::Converted) => {
                        // The slot held text for the old revision
                        self.cache.remove(&id);
                        self.baselines.cancel(&id);
                        self.baselines_resolved.remove(id.as_str());
                    }
                    Some(SnapshotExit::Merged { removed, .. }) => {
                        self.forget_tab(removed.id, &mut events);
                    }
                    None => debug!("Tab {} is not a pinned snapshot", id),
                }
            }

            BrowserAction::ViewStateChanged { tab_id, state } => {
                if !self.registry.update_view_state(&tab_id, state) {
                    debug!("Ignoring view state for closed tab {}", tab_id);
                }
            }
            BrowserAction::WidgetReady => {
                if let Some(tab) = self.registry.active_tab() {
                    events.push(BrowserEvent::RestoreViewState {
                        tab_id: tab.id.clone(),
                        state: tab.view_state.clone(),
                    });
                }
            }

            BrowserAction::SyncTimeTravel(state) => {
                self.snapshot.sync(state);
            }
            BrowserAction::ReturnToLive => {
                events.push(BrowserEvent::ReturnToLive);
            }

            BrowserAction::SetPanelBaseline(baseline) => {
                self.panel_baseline = baseline;
            }
            BrowserAction::SetRepoRoot(root) => {
                if root != self.repo_root {
                    info!("Switching repository to {}", root);
                    for tab in self.registry.close_all_tabs() {
                        self.forget_tab(tab.id, &mut events);
                    }
                    self.cache.clear();
                    self.tree.reset();
                    self.files.reset();
                    self.expanded_dirs.clear();
                    self.panel_baseline = PanelBaseline::default();
                    self.repo_root = root;
                }
            }
            BrowserAction::Refresh => {
                force_refresh = true;
            }
        }

        self.after_change(previous_active, force_refresh, &mut events);
        events
    }

    fn open_at_effective_revision(
        &mut self,
        path: &str,
        preview: bool,
        events: &mut Vec<BrowserEvent>,
    ) {
        let context = self.revision_context();
        let mut options = if preview {
            OpenOptions::preview()
        } else {
            OpenOptions::pinned()
        };
        if let Some(rev) = context.effective_revision {
            options = options.at_commit(rev.as_str()).snapshot();
            if let Some(timestamp) = context.effective_timestamp {
                options = options.at_time(timestamp);
            }
        }
        self.open(path, options, events);
    }

    fn open(&mut self, path: &str, options: OpenOptions, events: &mut Vec<BrowserEvent>) {
        let outcome = self.registry.open_tab(path, options);
        if let OpenKind::ReplacedPreview { replaced } = outcome.kind {
            self.forget_tab(replaced, events);
        }
    }

    fn navigate_breadcrumb(&mut self, path: &str, events: &mut Vec<BrowserEvent>) {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return;
        }

        let is_directory = self.tree.is_loaded()
            && self
                .tree
                .value()
                .find(path)
                .is_some_and(|node| node.is_directory);

        if is_directory {
            let expanded = if self.expanded_dirs.remove(path) {
                false
            } else {
                self.expanded_dirs.insert(path.to_string());
                true
            };
            events.push(BrowserEvent::DirectoryToggled {
                path: path.to_string(),
                expanded,
            });
        } else {
            self.open_at_effective_revision(path, false, events);
        }
    }

    /// Drop everything stored for a destroyed tab.
    fn forget_tab(&mut self, id: TabId, events: &mut Vec<BrowserEvent>) {
        self.cache.remove(id.as_str());
        self.baselines.cancel(id.as_str());
        self.baselines_resolved.remove(id.as_str());
        events.push(BrowserEvent::TabClosed(id));
    }

    fn after_change(
        &mut self,
        previous_active: Option<TabId>,
        force_refresh: bool,
        events: &mut Vec<BrowserEvent>,
    ) {
        let active = self.registry.active_id().cloned();
        if active != previous_active {
            debug!("Active tab changed: {:?} -> {:?}", previous_active, active);
            events.push(BrowserEvent::ActiveTabChanged {
                tab_id: active.clone(),
            });
            if let Some(id) = active {
                events.push(BrowserEvent::RestoreViewState {
                    state: self.registry.view_state(id.as_str()).cloned(),
                    tab_id: id,
                });
            }
        }

        self.request_active_content(events);

        let key = QueryKey::new(
            self.repo_root.clone(),
            self.revision_context().effective_revision,
        );
        let (tree, files) = if force_refresh {
            (
                Some(self.tree.reissue(key.clone())),
                Some(self.files.reissue(key)),
            )
        } else {
            (self.tree.issue(key.clone()), self.files.issue(key))
        };
        if let Some(ticket) = tree {
            events.push(BrowserEvent::LoadTree(ListingRequest { ticket }));
        }
        if let Some(ticket) = files {
            events.push(BrowserEvent::LoadFileList(ListingRequest { ticket }));
        }
    }

    fn request_active_content(&mut self, events: &mut Vec<BrowserEvent>) {
        let Some(tab) = self.registry.active_tab() else {
            return;
        };

        if tab.content.is_none() {
            if let Some(ticket) = self.cache.begin_load(&tab.id) {
                events.push(BrowserEvent::LoadContent(ContentRequest {
                    ticket,
                    repo_root: self.repo_root.clone(),
                    path: tab.path.clone(),
                    revision: tab.revision.clone(),
                }));
            }
        }

        let wants_baseline = self.options.load_parent_baseline
            && tab.previous_content.is_none()
            && !self.baselines_resolved.contains(tab.id.as_str());
        if let Some(rev) = tab.revision.as_ref().filter(|_| wants_baseline) {
            if let Some(ticket) = self.baselines.begin(&tab.id) {
                events.push(BrowserEvent::LoadPreviousContent(ContentRequest {
                    ticket,
                    repo_root: self.repo_root.clone(),
                    path: tab.path.clone(),
                    revision: Some(rev.parent()),
                }));
            }
        }
    }

    // === Load results ===

    /// Apply a content result. Returns `false` if it was stale.
    pub fn apply_content(&mut self, ticket: LoadTicket, result: Result<String, ProviderError>) -> bool {
        self.cache.complete(ticket, result)
    }

    /// Apply a parent-commit baseline result. Returns `false` if it was stale.
    ///
    /// A failure leaves the tab without a baseline and is not retried.
    pub fn apply_previous_content(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, ProviderError>,
    ) -> bool {
        if !self.baselines.finish(&ticket) {
            debug!("Discarding stale baseline load for tab {}", ticket.tab_id);
            return false;
        }

        match result {
            Ok(text) => {
                self.registry.fill_previous_content(ticket.tab_id.as_str(), text);
            }
            Err(e) => warn!("No baseline for tab {}: {}", ticket.tab_id, e),
        }
        self.baselines_resolved.insert(ticket.tab_id);
        true
    }

    /// Apply a tree result. Returns `false` if it was stale.
    pub fn apply_tree(&mut self, ticket: ListingTicket, result: Result<TreeNode, ProviderError>) -> bool {
        self.tree.apply(ticket, result)
    }

    /// Apply a file-list result. Returns `false` if it was stale.
    pub fn apply_file_list(
        &mut self,
        ticket: ListingTicket,
        result: Result<Vec<String>, ProviderError>,
    ) -> bool {
        self.files.apply(ticket, result)
    }

    // === Queries ===

    pub fn repo_root(&self) -> &str {
        &self.repo_root
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn tabs(&self) -> &[Tab] {
        self.registry.tabs()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.registry.active_tab()
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn snapshot(&self) -> &SnapshotCoordinator {
        &self.snapshot
    }

    pub fn panel_baseline(&self) -> &PanelBaseline {
        &self.panel_baseline
    }

    /// The revision context for the panel and the active tab.
    pub fn revision_context(&self) -> RevisionContext {
        RevisionContext::resolve(self.snapshot.state(), self.registry.active_tab())
    }

    /// Banner contents while browsing a snapshot.
    pub fn snapshot_banner(&self) -> Option<SnapshotBanner> {
        self.snapshot.banner()
    }

    /// Text to display for tab `id`, with the placeholder substituted for
    /// unavailable content. `None` while not loaded.
    pub fn content(&self, id: &str) -> Option<&str> {
        let tab = self.registry.get(id)?;
        if let Some(text) = tab.content.as_deref() {
            return Some(text);
        }
        self.cache
            .get(id)
            .map(|entry| entry.display(&self.options.unavailable_placeholder))
    }

    /// Real text of `tab`, `None` while loading or when unavailable.
    fn text<'a>(&'a self, tab: &'a Tab) -> Option<&'a str> {
        tab.content
            .as_deref()
            .or_else(|| self.cache.get(tab.id.as_str()).and_then(CachedContent::text))
    }

    /// Comparison content for the active tab.
    pub fn diff_baseline(&self) -> Option<DiffBaseline<'_>> {
        let tab = self.registry.active_tab()?;
        Some(DiffBaseline::resolve(tab, self.text(tab), &self.panel_baseline))
    }

    /// Props for the editor widget showing the active tab.
    pub fn editor_props(&self) -> Option<EditorProps<'_>> {
        let tab = self.registry.active_tab()?;
        let baseline = DiffBaseline::resolve(tab, self.text(tab), &self.panel_baseline);
        Some(EditorProps {
            tab_id: &tab.id,
            path: &tab.path,
            content: self.content(tab.id.as_str()),
            previous_content: baseline.previous_content,
            view_state: tab.view_state.as_ref(),
            has_diff_data: baseline.has_diff_data,
        })
    }

    /// The repository tree at the current effective revision.
    pub fn tree(&self) -> &TreeNode {
        self.tree.value()
    }

    pub fn expanded_dirs(&self) -> &HashSet<String> {
        &self.expanded_dirs
    }

    /// The tree flattened for rendering, honouring expanded directories.
    pub fn flat_tree(&self) -> Vec<FlatTreeEntry> {
        self.tree.value().flatten(&self.expanded_dirs)
    }

    /// Entries next to the active file, from the tree at the current
    /// effective revision. Empty until that tree has loaded.
    pub fn siblings(&self) -> Vec<SiblingEntry> {
        match self.registry.active_tab() {
            Some(tab) if self.tree.is_loaded() => self.tree.value().siblings_of(&tab.path),
            _ => Vec::new(),
        }
    }

    /// Breadcrumb segments `(name, path)` for the active file.
    pub fn breadcrumbs(&self) -> Vec<(String, String)> {
        self.registry
            .active_tab()
            .map(|tab| breadcrumbs(&tab.path))
            .unwrap_or_default()
    }

    /// All files available to quick-open.
    pub fn quick_open_files(&self) -> &[String] {
        self.files.value()
    }

    /// Files matching `query` as a case-insensitive subsequence, shorter
    /// paths first.
    pub fn quick_open_matches(&self, query: &str, limit: usize) -> Vec<&str> {
        let mut matches: Vec<&str> = self
            .files
            .value()
            .iter()
            .map(String::as_str)
            .filter(|path| is_subsequence(query, path))
            .collect();
        matches.sort_by_key(|path| path.len());
        matches.truncate(limit);
        matches
    }
}

fn is_subsequence(query: &str, candidate: &str) -> bool {
    let mut haystack = candidate.chars().flat_map(char::to_lowercase);
    query
        .chars()
        .flat_map(char::to_lowercase)
        .all(|needle| haystack.any(|c| c == needle))
}
