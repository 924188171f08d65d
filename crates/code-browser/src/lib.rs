//! # code-browser
//!
//! The tab and revision state machine behind a code browser panel that shows
//! files both at their live (working tree) state and at historical revisions
//! picked from a conversation timeline.
//!
//! ## Design Principles
//!
//! This crate is **instrumented**: it never reads files or talks to git by
//! itself. It receives [`BrowserAction`]s, mutates one owned aggregate
//! ([`CodeBrowserState`]) and emits [`BrowserEvent`]s. Load requests carry a
//! ticket; results are handed back through the `apply_*` methods, which drop
//! anything that went stale while it was in flight.
//!
//! - Tabs are keyed by `path` (live) or `"{commit}:{path}"` (pinned), so the
//!   same file can be open at several revisions at once.
//! - Content, diff baseline and editor view state are stored per tab id;
//!   closing one tab never touches another.
//! - A tab pinned to a commit keeps that commit while the global time-travel
//!   cursor moves; unpinned tabs follow the cursor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use code_browser::{BrowserAction, CodeBrowserState, Loader};
//!
//! let mut state = CodeBrowserState::new("/path/to/repo");
//! let loader = Loader::new(tree_provider, file_list_provider, content_provider);
//!
//! let events = state.handle_action(BrowserAction::FileClick("src/main.rs".into()));
//! for event in loader.run(&mut state, events).await {
//!     // Notifications: active tab changed, view state to restore, ...
//! }
//! ```

pub mod action;
pub mod event;
pub mod loader;
pub mod model;
pub mod state;
pub mod traits;

pub use action::BrowserAction;
pub use event::{BrowserEvent, ContentRequest, ListingRequest};
pub use loader::{LoadResult, Loader};
pub use model::{
    OpenOptions, Revision, SiblingEntry, Tab, TabId, TimeTravelState, TreeNode, ViewState,
};
pub use state::{
    BaselineSource, BrowserOptions, CachedContent, CodeBrowserState, ContentCache, DiffBaseline,
    EditorProps, LoadTicket, OpenKind, OpenOutcome, PanelBaseline, QueryKey, RevisionContext,
    SnapshotCoordinator, SnapshotExit, TabRegistry,
};
pub use traits::{
    ContentProvider, FileListProvider, NoOpContentProvider, NoOpFileListProvider,
    NoOpTreeProvider, ProviderError, TreeProvider,
};
