//! Ordered tab sequence and the active-tab pointer.

use crate::model::{OpenOptions, Revision, Tab, TabId, ViewState};
use log::{debug, warn};

/// How [`TabRegistry::open_tab`] resolved an open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenKind {
    /// A new pinned or preview tab was appended at the end.
    Appended,
    /// The existing preview tab was replaced in place.
    ReplacedPreview {
        /// Id of the preview tab that was destroyed.
        replaced: TabId,
    },
    /// The identity was already open and is now active.
    Activated,
    /// The identity was open as a preview and is now pinned.
    Promoted,
}

/// How [`TabRegistry::exit_snapshot`] turned a pinned tab live.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotExit {
    /// The tab now shows the live file under its old id.
    Converted,
    /// The live file was already open; the pinned tab was closed instead.
    Merged {
        /// The removed pinned tab.
        removed: Tab,
        /// The live tab that took over.
        into: TabId,
    },
}

/// Result of an open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOutcome {
    /// The tab that is now active.
    pub id: TabId,
    pub kind: OpenKind,
}

/// Owns the open tabs in display order.
///
/// Invariants:
/// - tab ids are unique;
/// - at most one tab is a preview;
/// - the active id, when set, names an open tab.
///
/// Tabs are never reordered. Operations on one tab never read or write the
/// `content`, `previous_content` or `view_state` of another.
#[derive(Debug, Clone, Default)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active: Option<TabId>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabs in display order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn active_id(&self) -> Option<&TabId> {
        self.active.as_ref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.as_ref().and_then(|id| self.get(id.as_str()))
    }

    /// The current preview tab, if any.
    pub fn preview_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.is_preview)
    }

    /// Open `path` or activate the tab that already has its identity.
    ///
    /// - A preview open replaces an existing preview tab in place, but never
    ///   demotes a pinned tab with the same identity.
    /// - An explicit open promotes a matching preview tab in place, or appends
    ///   a new pinned tab.
    ///
    /// The resulting tab always becomes active. Supplied content is only used
    /// when a tab is created.
    pub fn open_tab(&mut self, path: &str, options: OpenOptions) -> OpenOutcome {
        let revision = Revision::from_optional(options.commit_hash.as_deref());
        if revision.is_none() {
            if let Some(raw) = options.commit_hash.as_deref() {
                warn!("Ignoring malformed commit {:?} for {}, opening live", raw, path);
            }
        }
        let id = TabId::derive(path, revision.as_ref());

        // A tab that left snapshot mode keeps an id that no longer matches
        // its revision, so identity is checked on (path, revision) first.
        let existing = self
            .tabs
            .iter()
            .position(|t| t.path == path && t.revision == revision)
            .or_else(|| self.position(id.as_str()));
        if let Some(idx) = existing {
            let tab = &mut self.tabs[idx];
            let id = tab.id.clone();
            let kind = if tab.is_preview && !options.preview {
                tab.is_preview = false;
                debug!("Promoted preview tab {} to pinned", id);
                OpenKind::Promoted
            } else {
                OpenKind::Activated
            };
            self.active = Some(id.clone());
            return OpenOutcome { id, kind };
        }

        let is_historical = revision.is_some();
        let tab = Tab {
            id: id.clone(),
            path: path.to_string(),
            revision,
            timestamp: options.timestamp.filter(|_| is_historical),
            is_preview: options.preview,
            is_snapshot: options.is_snapshot && is_historical,
            content: options.content,
            previous_content: options.previous_content,
            view_state: None,
        };

        let kind = match self.tabs.iter().position(|t| t.is_preview) {
            Some(idx) if options.preview => {
                let replaced = std::mem::replace(&mut self.tabs[idx], tab).id;
                debug!("Replaced preview tab {} with {}", replaced, id);
                OpenKind::ReplacedPreview { replaced }
            }
            _ => {
                self.tabs.push(tab);
                debug!("Opened tab {} (total: {})", id, self.tabs.len());
                OpenKind::Appended
            }
        };

        self.active = Some(id.clone());
        OpenOutcome { id, kind }
    }

    /// Activate `id`. Returns `false` (and changes nothing) if it is not open.
    pub fn set_active_tab(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.active = Some(self.tabs[idx].id.clone());
                true
            }
            None => false,
        }
    }

    /// Activate the next tab in display order, wrapping around.
    pub fn activate_next(&mut self) -> bool {
        self.activate_offset(1)
    }

    /// Activate the previous tab in display order, wrapping around.
    pub fn activate_previous(&mut self) -> bool {
        self.activate_offset(self.tabs.len().saturating_sub(1))
    }

    fn activate_offset(&mut self, offset: usize) -> bool {
        if self.tabs.is_empty() {
            return false;
        }
        let current = self
            .active
            .as_ref()
            .and_then(|id| self.position(id.as_str()))
            .unwrap_or(0);
        let next = (current + offset) % self.tabs.len();
        self.active = Some(self.tabs[next].id.clone());
        true
    }

    /// Close `id` and return the removed tab.
    ///
    /// If it was active, activation falls to the left neighbour, else the
    /// right neighbour, else nothing.
    pub fn close_tab(&mut self, id: &str) -> Option<Tab> {
        let idx = self.position(id)?;
        let removed = self.tabs.remove(idx);

        if self.active.as_ref() == Some(&removed.id) {
            self.active = if idx > 0 {
                Some(self.tabs[idx - 1].id.clone())
            } else {
                self.tabs.first().map(|t| t.id.clone())
            };
        }

        debug!("Closed tab {} (index {}, remaining: {})", removed.id, idx, self.tabs.len());
        Some(removed)
    }

    /// Close every tab.
    pub fn close_all_tabs(&mut self) -> Vec<Tab> {
        self.active = None;
        std::mem::take(&mut self.tabs)
    }

    /// Close every tab except `id`, which becomes active.
    ///
    /// Does nothing if `id` is not open.
    pub fn close_other_tabs(&mut self, id: &str) -> Vec<Tab> {
        let Some(idx) = self.position(id) else {
            return Vec::new();
        };
        let keep = self.tabs.remove(idx);
        let removed = std::mem::replace(&mut self.tabs, vec![keep]);
        self.active = Some(self.tabs[0].id.clone());
        removed
    }

    /// Close every tab right of `id`.
    ///
    /// If the active tab was among them, `id` becomes active.
    pub fn close_tabs_to_right(&mut self, id: &str) -> Vec<Tab> {
        let Some(idx) = self.position(id) else {
            return Vec::new();
        };
        let removed: Vec<Tab> = self.tabs.drain(idx + 1..).collect();
        let active_removed = self
            .active
            .as_ref()
            .is_some_and(|active| removed.iter().any(|t| &t.id == active));
        if active_removed {
            self.active = Some(self.tabs[idx].id.clone());
        }
        removed
    }

    /// Convert a pinned historical tab into a live view of the same path.
    ///
    /// The tab keeps its id, position and view state. Its revision, timestamp
    /// and snapshot flag are cleared, together with supplied content and
    /// baseline that belonged to the old revision. If the live file is
    /// already open in another tab, the pinned tab is closed and the live
    /// one takes over (and becomes active if the pinned one was).
    ///
    /// The converted tab still owns the id `"{commit}:{path}"`. Re-opening
    /// `path` at that commit afterwards activates it (now showing the live
    /// file) rather than creating a second tab with the same id.
    ///
    /// Returns `None` if the tab is absent or already live.
    pub fn exit_snapshot(&mut self, id: &str) -> Option<SnapshotExit> {
        let idx = self.position(id)?;
        if self.tabs[idx].revision.is_none() {
            return None;
        }

        let path = self.tabs[idx].path.clone();
        let live = self
            .tabs
            .iter()
            .find(|t| t.path == path && t.revision.is_none())
            .map(|t| t.id.clone());
        if let Some(into) = live {
            let removed = self.tabs.remove(idx);
            if self.active.as_ref() == Some(&removed.id) {
                self.active = Some(into.clone());
            }
            debug!("Tab {} left snapshot mode, merged into live {}", removed.id, into);
            return Some(SnapshotExit::Merged { removed, into });
        }

        let tab = &mut self.tabs[idx];
        tab.revision = None;
        tab.timestamp = None;
        tab.is_snapshot = false;
        tab.content = None;
        tab.previous_content = None;
        debug!("Tab {} left snapshot mode, now showing live {}", tab.id, tab.path);
        Some(SnapshotExit::Converted)
    }

    /// Overwrite the view state of `id`. No-op if the tab is absent.
    pub fn update_view_state(&mut self, id: &str, state: ViewState) -> bool {
        match self.get_mut(id) {
            Some(tab) => {
                tab.view_state = Some(state);
                true
            }
            None => false,
        }
    }

    pub fn view_state(&self, id: &str) -> Option<&ViewState> {
        self.get(id).and_then(|t| t.view_state.as_ref())
    }

    /// Set the baseline of `id` if it has none yet.
    pub(crate) fn fill_previous_content(&mut self, id: &str, previous: String) -> bool {
        match self.get_mut(id) {
            Some(tab) if tab.previous_content.is_none() => {
                tab.previous_content = Some(previous);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;

    const C1: &str = "c1c1c1c1";
    const C2: &str = "c2c2c2c2";

    fn ids(registry: &TabRegistry) -> Vec<&str> {
        registry.tabs().iter().map(|t| t.id.as_str()).collect()
    }

    fn assert_invariants(registry: &TabRegistry) {
        let unique: HashSet<&str> = ids(registry).into_iter().collect();
        assert_eq!(unique.len(), registry.len(), "tab ids must be unique");
        assert!(registry.tabs().iter().filter(|t| t.is_preview).count() <= 1);
        if let Some(active) = registry.active_id() {
            assert!(registry.get(active.as_str()).is_some());
        }
    }

    #[test]
    fn test_open_same_identity_twice_activates() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a.ts", OpenOptions::pinned());
        registry.open_tab("b.ts", OpenOptions::pinned());

        let outcome = registry.open_tab("a.ts", OpenOptions::pinned());
        assert_eq!(outcome.kind, OpenKind::Activated);
        assert_eq!(ids(&registry), vec!["a.ts", "b.ts"]);
        assert_eq!(registry.active_id().unwrap(), "a.ts");
    }

    #[test]
    fn test_multi_revision_identities() {
        let mut registry = TabRegistry::new();
        registry.open_tab("path", OpenOptions::pinned().at_commit(C1));
        registry.open_tab("path", OpenOptions::pinned().at_commit(C2));
        registry.open_tab("path", OpenOptions::pinned());

        assert_eq!(
            ids(&registry),
            vec!["c1c1c1c1:path", "c2c2c2c2:path", "path"]
        );
        assert_invariants(&registry);
    }

    #[test]
    fn test_preview_replaced_in_place() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a.ts", OpenOptions::pinned());
        registry.open_tab("b.ts", OpenOptions::preview());
        registry.open_tab("c.ts", OpenOptions::pinned());

        let outcome = registry.open_tab("d.ts", OpenOptions::preview());
        assert_eq!(
            outcome.kind,
            OpenKind::ReplacedPreview {
                replaced: TabId::derive("b.ts", None)
            }
        );
        assert_eq!(ids(&registry), vec!["a.ts", "d.ts", "c.ts"]);
        assert_eq!(registry.preview_tab().unwrap().id, "d.ts");
        assert_eq!(registry.active_id().unwrap(), "d.ts");
        assert_invariants(&registry);
    }

    #[test]
    fn test_preview_never_demotes_pin() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a.ts", OpenOptions::pinned());
        let outcome = registry.open_tab("a.ts", OpenOptions::preview());

        assert_eq!(outcome.kind, OpenKind::Activated);
        assert_eq!(registry.len(), 1);
        assert!(!registry.tabs()[0].is_preview);
    }

    #[test]
    fn test_preview_same_identity_is_activated() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a.ts", OpenOptions::preview());
        registry.open_tab("b.ts", OpenOptions::pinned());

        let outcome = registry.open_tab("a.ts", OpenOptions::preview());
        assert_eq!(outcome.kind, OpenKind::Activated);
        assert_eq!(ids(&registry), vec!["a.ts", "b.ts"]);
        assert!(registry.get("a.ts").unwrap().is_preview);
    }

    #[test]
    fn test_explicit_open_promotes_preview_in_place() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a.ts", OpenOptions::pinned());
        registry.open_tab("b.ts", OpenOptions::preview());
        registry.open_tab("c.ts", OpenOptions::pinned());

        let outcome = registry.open_tab("b.ts", OpenOptions::pinned());
        assert_eq!(outcome.kind, OpenKind::Promoted);
        assert_eq!(ids(&registry), vec!["a.ts", "b.ts", "c.ts"]);
        assert!(registry.preview_tab().is_none());

        // A later preview appends instead of replacing the promoted tab
        registry.open_tab("d.ts", OpenOptions::preview());
        assert_eq!(ids(&registry), vec!["a.ts", "b.ts", "c.ts", "d.ts"]);
    }

    #[test]
    fn test_malformed_commit_opens_live() {
        let mut registry = TabRegistry::new();
        let outcome = registry.open_tab(
            "a.ts",
            OpenOptions::pinned().at_commit("").snapshot(),
        );
        assert_eq!(outcome.id, "a.ts");
        let tab = registry.get("a.ts").unwrap();
        assert!(tab.revision.is_none());
        assert!(!tab.is_snapshot);

        let outcome = registry.open_tab("a.ts", OpenOptions::pinned().at_commit("xyz"));
        assert_eq!(outcome.kind, OpenKind::Activated);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reopen_keeps_original_fields() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a.ts", OpenOptions::pinned().with_content("first"));
        registry.open_tab("a.ts", OpenOptions::pinned().with_content("second"));
        assert_eq!(registry.get("a.ts").unwrap().content.as_deref(), Some("first"));
    }

    #[test]
    fn test_close_active_middle_activates_left() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned());
        registry.open_tab("b", OpenOptions::pinned());
        registry.open_tab("c", OpenOptions::pinned());
        registry.set_active_tab("b");

        registry.close_tab("b");
        assert_eq!(registry.active_id().unwrap(), "a");
    }

    #[test]
    fn test_close_first_active_activates_right() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned());
        registry.open_tab("b", OpenOptions::pinned());
        registry.set_active_tab("a");

        registry.close_tab("a");
        assert_eq!(registry.active_id().unwrap(), "b");

        registry.close_tab("b");
        assert!(registry.active_id().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned());
        registry.open_tab("b", OpenOptions::pinned());
        registry.open_tab("c", OpenOptions::pinned());

        registry.close_tab("a");
        assert_eq!(registry.active_id().unwrap(), "c");
        assert!(registry.close_tab("missing").is_none());
    }

    #[test]
    fn test_close_does_not_touch_siblings() {
        let mut registry = TabRegistry::new();
        registry.open_tab(
            "a",
            OpenOptions::pinned()
                .with_content("a-new")
                .with_previous_content("a-old"),
        );
        registry.open_tab(
            "b",
            OpenOptions::pinned()
                .with_content("b-new")
                .with_previous_content("b-old"),
        );
        registry.update_view_state("a", ViewState::new(json!({ "line": 1 })));
        registry.update_view_state("b", ViewState::new(json!({ "line": 2 })));

        let before = registry.get("a").unwrap().clone();
        registry.close_tab("b");
        assert_eq!(registry.get("a").unwrap(), &before);
    }

    #[test]
    fn test_batch_closes() {
        let mut registry = TabRegistry::new();
        for path in ["a", "b", "c", "d"] {
            registry.open_tab(path, OpenOptions::pinned());
        }

        let removed = registry.close_tabs_to_right("b");
        assert_eq!(removed.len(), 2);
        assert_eq!(ids(&registry), vec!["a", "b"]);
        assert_eq!(registry.active_id().unwrap(), "b");

        let removed = registry.close_other_tabs("a");
        assert_eq!(removed.len(), 1);
        assert_eq!(ids(&registry), vec!["a"]);
        assert_eq!(registry.active_id().unwrap(), "a");

        assert!(registry.close_other_tabs("missing").is_empty());
        assert_eq!(registry.close_all_tabs().len(), 1);
        assert!(registry.active_id().is_none());
    }

    #[test]
    fn test_set_active_absent_is_noop() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned());
        assert!(!registry.set_active_tab("zzz"));
        assert_eq!(registry.active_id().unwrap(), "a");
    }

    #[test]
    fn test_activate_next_and_previous_wrap() {
        let mut registry = TabRegistry::new();
        for path in ["a", "b", "c"] {
            registry.open_tab(path, OpenOptions::pinned());
        }

        registry.activate_next();
        assert_eq!(registry.active_id().unwrap(), "a");
        registry.activate_previous();
        assert_eq!(registry.active_id().unwrap(), "c");
        registry.activate_previous();
        assert_eq!(registry.active_id().unwrap(), "b");
    }

    #[test]
    fn test_exit_snapshot_keeps_id_and_position() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned());
        registry.open_tab(
            "b",
            OpenOptions::pinned()
                .at_commit(C1)
                .at_time(chrono::Utc::now())
                .with_content("old text")
                .snapshot(),
        );
        registry.open_tab("c", OpenOptions::pinned());
        registry.update_view_state("c1c1c1c1:b", ViewState::new(json!({ "line": 9 })));

        assert_eq!(registry.exit_snapshot("c1c1c1c1:b"), Some(SnapshotExit::Converted));
        assert_eq!(ids(&registry), vec!["a", "c1c1c1c1:b", "c"]);

        let tab = registry.get("c1c1c1c1:b").unwrap();
        assert!(tab.revision.is_none());
        assert!(tab.timestamp.is_none());
        assert!(!tab.is_snapshot);
        assert!(tab.content.is_none());
        assert_eq!(tab.view_state, Some(ViewState::new(json!({ "line": 9 }))));

        // Already live
        assert_eq!(registry.exit_snapshot("c1c1c1c1:b"), None);
        assert_eq!(registry.exit_snapshot("a"), None);
    }

    #[test]
    fn test_live_open_after_exit_snapshot_reuses_tab() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned().at_commit(C1));
        registry.exit_snapshot("c1c1c1c1:a");
        registry.open_tab("b", OpenOptions::pinned());

        let outcome = registry.open_tab("a", OpenOptions::pinned());
        assert_eq!(outcome.kind, OpenKind::Activated);
        assert_eq!(outcome.id, "c1c1c1c1:a");
        assert_eq!(ids(&registry), vec!["c1c1c1c1:a", "b"]);
        assert_eq!(registry.active_id().unwrap(), "c1c1c1c1:a");

        // The old commit id is still taken by the converted tab
        let outcome = registry.open_tab("a", OpenOptions::pinned().at_commit(C1));
        assert_eq!(outcome.kind, OpenKind::Activated);
        assert_eq!(ids(&registry), vec!["c1c1c1c1:a", "b"]);
        assert_invariants(&registry);
    }

    #[test]
    fn test_exit_snapshot_merges_into_open_live_tab() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned());
        registry.open_tab("a", OpenOptions::pinned().at_commit(C1));
        assert_eq!(registry.active_id().unwrap(), "c1c1c1c1:a");

        let exit = registry.exit_snapshot("c1c1c1c1:a").unwrap();
        match exit {
            SnapshotExit::Merged { removed, into } => {
                assert_eq!(removed.id, "c1c1c1c1:a");
                assert_eq!(into, "a");
            }
            other => panic!("expected merge, got {:?}", other),
        }
        assert_eq!(ids(&registry), vec!["a"]);
        assert_eq!(registry.active_id().unwrap(), "a");

        let outcome = registry.open_tab("a", OpenOptions::pinned());
        assert_eq!(outcome.kind, OpenKind::Activated);
        assert_eq!(registry.len(), 1);
        assert_invariants(&registry);
    }

    #[test]
    fn test_update_view_state_roundtrip_and_absent() {
        let mut registry = TabRegistry::new();
        registry.open_tab("a", OpenOptions::pinned());

        let state = ViewState::new(json!({ "cursor": [3, 4], "folds": [] }));
        assert!(registry.update_view_state("a", state.clone()));
        assert_eq!(registry.view_state("a"), Some(&state));

        assert!(!registry.update_view_state("missing", state));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_invariants_hold_across_mixed_sequence() {
        let mut registry = TabRegistry::new();
        let steps: Vec<(&str, OpenOptions)> = vec![
            ("a", OpenOptions::preview()),
            ("b", OpenOptions::preview()),
            ("a", OpenOptions::pinned()),
            ("b", OpenOptions::preview().at_commit(C1)),
            ("b", OpenOptions::pinned().at_commit(C1)),
            ("c", OpenOptions::preview()),
            ("a", OpenOptions::preview()),
            ("c", OpenOptions::preview().at_commit(C2)),
        ];
        for (path, options) in steps {
            registry.open_tab(path, options);
            assert_invariants(&registry);
        }
        registry.close_tab("c2c2c2c2:c");
        assert_invariants(&registry);
    }
}
