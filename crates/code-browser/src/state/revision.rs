//! Effective revision resolution.

use crate::model::{Revision, Tab, TimeTravelState};
use chrono::{DateTime, Utc};

/// Panel-level revision context: the revision queries are made at.
///
/// Distinct from any tab's own pin. An unpinned (live) active tab follows
/// the global time-travel cursor; a pinned tab keeps its own commit while
/// the cursor moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionContext {
    pub is_historical_mode: bool,
    /// Never an empty or malformed value; `None` means live.
    pub effective_revision: Option<Revision>,
    pub effective_timestamp: Option<DateTime<Utc>>,
}

impl RevisionContext {
    /// Combine the global cursor with the active tab's pin.
    pub fn resolve(panel: &TimeTravelState, active: Option<&Tab>) -> Self {
        let follows_panel =
            panel.is_historical_mode && active.map_or(true, |tab| tab.revision.is_none());

        let (effective_revision, effective_timestamp) = if follows_panel {
            (panel.revision(), panel.timestamp)
        } else {
            match active {
                Some(tab) => (tab.revision.clone(), tab.timestamp),
                None => (None, None),
            }
        };

        Self {
            is_historical_mode: panel.is_historical_mode,
            effective_revision,
            effective_timestamp,
        }
    }

    /// The revision to pass as a query parameter (`None` = live).
    pub fn query_revision(&self) -> Option<&Revision> {
        self.effective_revision.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpenOptions, TabId};
    use crate::state::TabRegistry;

    const PANEL: &str = "aaaaaaa1";
    const PIN: &str = "bbbbbbb2";

    fn tab(commit: Option<&str>) -> Tab {
        let mut registry = TabRegistry::new();
        let mut options = OpenOptions::pinned();
        if let Some(commit) = commit {
            options = options.at_commit(commit);
        }
        let outcome = registry.open_tab("src/a.rs", options);
        registry.get(outcome.id.as_str()).cloned().unwrap()
    }

    #[test]
    fn test_live_panel_uses_tab_pin() {
        let panel = TimeTravelState::live();

        let live = RevisionContext::resolve(&panel, Some(&tab(None)));
        assert_eq!(live.effective_revision, None);

        let pinned = RevisionContext::resolve(&panel, Some(&tab(Some(PIN))));
        assert_eq!(pinned.query_revision().unwrap().as_str(), PIN);
        assert!(!pinned.is_historical_mode);
    }

    #[test]
    fn test_historical_panel_drives_unpinned_tab() {
        let ts = chrono::Utc::now();
        let panel = TimeTravelState::historical(PANEL, Some(ts), None);

        let ctx = RevisionContext::resolve(&panel, Some(&tab(None)));
        assert_eq!(ctx.effective_revision.unwrap().as_str(), PANEL);
        assert_eq!(ctx.effective_timestamp, Some(ts));
    }

    #[test]
    fn test_pinned_tab_ignores_moving_cursor() {
        let panel = TimeTravelState::historical(PANEL, None, None);
        let ctx = RevisionContext::resolve(&panel, Some(&tab(Some(PIN))));
        assert_eq!(ctx.effective_revision.unwrap().as_str(), PIN);
    }

    #[test]
    fn test_no_active_tab() {
        let historical = TimeTravelState::historical(PANEL, None, None);
        let ctx = RevisionContext::resolve(&historical, None);
        assert_eq!(ctx.effective_revision.unwrap().as_str(), PANEL);

        let ctx = RevisionContext::resolve(&TimeTravelState::live(), None);
        assert_eq!(ctx, RevisionContext::default());
    }

    #[test]
    fn test_empty_panel_commit_normalizes_to_live() {
        let panel = TimeTravelState::historical("", None, None);
        let ctx = RevisionContext::resolve(&panel, Some(&tab(None)));
        assert!(ctx.is_historical_mode);
        assert_eq!(ctx.query_revision(), None);

        let short = TimeTravelState::historical("ab", None, None);
        assert_eq!(RevisionContext::resolve(&short, None).query_revision(), None);
    }

    #[test]
    fn test_derived_ids_follow_resolution() {
        let panel = TimeTravelState::historical(PANEL, None, None);
        let ctx = RevisionContext::resolve(&panel, None);
        let id = TabId::derive("src/a.rs", ctx.query_revision());
        assert_eq!(id, "aaaaaaa1:src/a.rs");
    }
}
