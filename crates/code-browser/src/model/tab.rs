//! Tab identity and per-tab data.

use super::{Revision, ViewState};
use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::fmt;

/// Identity of an open tab.
///
/// Derived from the path and the pinned revision: `path` for a live tab,
/// `"{commit}:{path}"` for a tab pinned to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(String);

impl TabId {
    /// Derive the id for `path` at an optional pinned revision.
    pub fn derive(path: &str, revision: Option<&Revision>) -> Self {
        match revision {
            Some(rev) => Self(format!("{}:{}", rev, path)),
            None => Self(path.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TabId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TabId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TabId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One open (file, revision) entry in the code browser.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    /// Identity, fixed for the lifetime of the tab.
    pub id: TabId,
    /// File path relative to the repository root.
    pub path: String,
    /// Commit the tab is pinned to (`None` = live working tree).
    pub revision: Option<Revision>,
    /// Time of the pinned commit.
    pub timestamp: Option<DateTime<Utc>>,
    /// Transient single-slot tab opened by a lightweight selection.
    pub is_preview: bool,
    /// Opened while browsing a historical snapshot.
    pub is_snapshot: bool,
    /// Content supplied by the opener (loaded content lives in the cache).
    pub content: Option<String>,
    /// Diff baseline supplied by the opener or loaded for the pinned commit.
    pub previous_content: Option<String>,
    /// Opaque editor view state (cursor, scroll, folds).
    pub view_state: Option<ViewState>,
}

impl Tab {
    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Whether the tab shows a historical revision.
    pub fn is_historical(&self) -> bool {
        self.revision.is_some()
    }

    /// Title for a tab bar: file name, plus the short hash when pinned.
    pub fn title(&self) -> String {
        match &self.revision {
            Some(rev) => format!("{} @ {}", self.file_name(), rev.short()),
            None => self.file_name().to_string(),
        }
    }
}

/// Options for opening a tab.
///
/// `commit_hash` is a raw value; it is validated when the tab is opened and
/// malformed values open the live file instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenOptions {
    pub preview: bool,
    pub commit_hash: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub previous_content: Option<String>,
    pub is_snapshot: bool,
}

impl OpenOptions {
    /// Explicit (pinned) open.
    pub fn pinned() -> Self {
        Self::default()
    }

    /// Preview open.
    pub fn preview() -> Self {
        Self {
            preview: true,
            ..Self::default()
        }
    }

    pub fn at_commit(mut self, commit_hash: impl Into<String>) -> Self {
        self.commit_hash = Some(commit_hash.into());
        self
    }

    pub fn at_time(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_previous_content(mut self, previous: impl Into<String>) -> Self {
        self.previous_content = Some(previous.into());
        self
    }

    pub fn snapshot(mut self) -> Self {
        self.is_snapshot = true;
        self
    }
}
