//! Global live-vs-historical mode, driven by the timeline collaborator.

use crate::model::{Revision, TimeTravelState};
use chrono::{DateTime, Utc};
use log::info;

/// What the surrounding chrome shows while browsing a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotBanner {
    pub short_hash: String,
    pub commit_message: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Tracks the last time-travel state pushed by the timeline.
///
/// The coordinator never flips modes on its own. A "return to live" request
/// is forwarded to the collaborator, which answers with a new state through
/// [`SnapshotCoordinator::sync`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotCoordinator {
    state: TimeTravelState,
}

impl SnapshotCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TimeTravelState {
        &self.state
    }

    pub fn is_historical(&self) -> bool {
        self.state.is_historical_mode
    }

    /// The normalized panel revision (`None` when live or malformed).
    pub fn panel_revision(&self) -> Option<Revision> {
        self.state.revision()
    }

    /// Store a new state from the collaborator.
    ///
    /// Returns `true` when the mode or normalized revision changed, i.e. when
    /// queries that follow the panel must be reissued. Changes to message or
    /// timestamp alone return `false`.
    pub fn sync(&mut self, next: TimeTravelState) -> bool {
        let changed = next.is_historical_mode != self.state.is_historical_mode
            || next.revision() != self.state.revision();

        if changed {
            match next.revision() {
                Some(rev) => info!("Time travel to {}", rev.short()),
                None if next.is_historical_mode => {
                    info!("Time travel without a usable commit, querying live")
                }
                None => info!("Back to live"),
            }
        }

        self.state = next;
        changed
    }

    /// Banner contents, only while in historical mode with a usable commit.
    pub fn banner(&self) -> Option<SnapshotBanner> {
        let rev = self.panel_revision()?;
        Some(SnapshotBanner {
            short_hash: rev.short().to_string(),
            commit_message: self.state.commit_message.clone(),
            timestamp: self.state.timestamp,
        })
    }
}
