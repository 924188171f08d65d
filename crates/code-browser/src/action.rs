//! Code Browser Actions
//!
//! Semantic actions the browser state understands. The orchestrating
//! application maps clicks, key events and collaborator callbacks to these
//! and dispatches them to [`CodeBrowserState::handle_action`](crate::CodeBrowserState::handle_action).

use crate::model::{OpenOptions, TimeTravelState, ViewState};
use crate::state::PanelBaseline;

/// Actions that can be performed on the code browser.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    // === Navigation ===
    /// Single click in the file tree: preview-open at the effective revision
    FileClick(String),
    /// Double click in the file tree: pinned-open at the effective revision
    FileDoubleClick(String),
    /// Quick-open selection: pinned-open at the effective revision
    QuickOpenSelect(String),
    /// Breadcrumb segment: toggle a directory or pinned-open a file
    BreadcrumbNavigate(String),
    /// Open a tab with explicit options (supplied content, pinned commit)
    OpenTab { path: String, options: OpenOptions },

    // === Tab Bar ===
    /// Activate a tab by id
    ActivateTab(String),
    /// Activate the next tab, wrapping around
    NextTab,
    /// Activate the previous tab, wrapping around
    PrevTab,
    /// Close a tab by id
    CloseTab(String),
    /// Close every tab
    CloseAllTabs,
    /// Close every tab except the given one
    CloseOtherTabs(String),
    /// Close every tab right of the given one
    CloseTabsToRight(String),
    /// Turn a pinned historical tab into a live view of the same file
    ExitSnapshot(String),

    // === Editor Widget ===
    /// The editor reported a new view state for the tab it was showing
    ViewStateChanged { tab_id: String, state: ViewState },
    /// The editor widget (re)mounted and wants the active view state
    WidgetReady,

    // === Time Travel ===
    /// New state pushed by the timeline collaborator
    SyncTimeTravel(TimeTravelState),
    /// Ask the timeline collaborator to go back to live
    ReturnToLive,

    // === Panel ===
    /// Set the panel-level diff baseline
    SetPanelBaseline(PanelBaseline),
    /// Point the browser at another repository
    SetRepoRoot(String),
    /// Reissue tree and file-list queries for the current revision
    Refresh,
}

impl BrowserAction {
    /// Check if this action opens or activates a tab from a file reference
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            BrowserAction::FileClick(_)
                | BrowserAction::FileDoubleClick(_)
                | BrowserAction::QuickOpenSelect(_)
                | BrowserAction::BreadcrumbNavigate(_)
                | BrowserAction::OpenTab { .. }
        )
    }

    /// Check if this action closes tabs
    pub fn is_close(&self) -> bool {
        matches!(
            self,
            BrowserAction::CloseTab(_)
                | BrowserAction::CloseAllTabs
                | BrowserAction::CloseOtherTabs(_)
                | BrowserAction::CloseTabsToRight(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_navigation() {
        assert!(BrowserAction::FileClick("a.rs".into()).is_navigation());
        assert!(BrowserAction::QuickOpenSelect("a.rs".into()).is_navigation());
        assert!(!BrowserAction::NextTab.is_navigation());
        assert!(!BrowserAction::CloseTab("a.rs".into()).is_navigation());
    }

    #[test]
    fn test_is_close() {
        assert!(BrowserAction::CloseAllTabs.is_close());
        assert!(BrowserAction::CloseTabsToRight("a.rs".into()).is_close());
        assert!(!BrowserAction::ExitSnapshot("a.rs".into()).is_close());
    }
}
