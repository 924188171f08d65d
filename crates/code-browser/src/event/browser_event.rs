//! Events emitted by [`CodeBrowserState`](crate::CodeBrowserState).

use crate::model::{Revision, TabId, ViewState};
use crate::state::{ListingTicket, LoadTicket};

/// Events emitted by the browser state.
///
/// The browser is instrumented: it asks for loads instead of performing them.
/// The orchestrator fulfils `Load*` events with providers (see
/// [`Loader`](crate::Loader)) and hands results back through the matching
/// `apply_*` method together with the ticket from the request.
///
/// # Example
///
/// ```ignore
/// for event in state.handle_action(BrowserAction::FileClick(path)) {
///     match event {
///         BrowserEvent::LoadContent(request) => {
///             let result = provider
///                 .read_at_revision(&request.repo_root, &request.path, request.revision.as_ref())
///                 .await;
///             state.apply_content(request.ticket, result);
///         }
///         BrowserEvent::RestoreViewState { state: Some(view), .. } => {
///             editor.restore(view.decode()?);
///         }
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    /// Load the text of a tab.
    LoadContent(ContentRequest),

    /// Load the diff baseline of a pinned tab (the file at the parent commit).
    LoadPreviousContent(ContentRequest),

    /// Load the repository tree at the request's revision.
    LoadTree(ListingRequest),

    /// Load the quick-open file list at the request's revision.
    LoadFileList(ListingRequest),

    /// The active tab changed (`None` when the last tab closed).
    ActiveTabChanged {
        tab_id: Option<TabId>,
    },

    /// The editor should restore this view state for the active tab.
    RestoreViewState {
        tab_id: TabId,
        state: Option<ViewState>,
    },

    /// A tab was destroyed (explicit close or preview replacement).
    TabClosed(TabId),

    /// A directory was expanded or collapsed from the breadcrumbs.
    DirectoryToggled {
        path: String,
        expanded: bool,
    },

    /// The user asked to leave time travel; the timeline collaborator should
    /// run its "return to live" callback.
    ReturnToLive,
}

impl BrowserEvent {
    /// Whether the event asks for a provider call.
    pub fn is_load(&self) -> bool {
        matches!(
            self,
            BrowserEvent::LoadContent(_)
                | BrowserEvent::LoadPreviousContent(_)
                | BrowserEvent::LoadTree(_)
                | BrowserEvent::LoadFileList(_)
        )
    }
}

/// A content read for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub ticket: LoadTicket,
    pub repo_root: String,
    pub path: String,
    /// Never empty; `None` reads the working tree.
    pub revision: Option<Revision>,
}

/// A tree or file-list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub ticket: ListingTicket,
}

impl ListingRequest {
    pub fn repo_root(&self) -> &str {
        &self.ticket.key.repo_root
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.ticket.key.revision.as_ref()
    }
}
