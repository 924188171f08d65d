//! Validated revision identifiers and the global time-travel cursor.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Abbreviated or full commit hash: 7 to 64 hex digits (sha1 or sha256).
static COMMIT_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{7,64}$").expect("commit hash pattern is valid"));

/// A commit identifier that is safe to forward to a provider query.
///
/// The only ways to obtain one are [`Revision::parse`] (which rejects empty
/// and malformed input) and [`Revision::parent`]. Code that holds an
/// `Option<Revision>` therefore never forwards an empty revision parameter:
/// `None` means "query the live working tree".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(String);

impl Revision {
    /// Length of the abbreviated form shown in titles and banners.
    pub const SHORT_LEN: usize = 7;

    /// Parse a raw commit value, trimming surrounding whitespace.
    ///
    /// Returns `None` for empty, too short or non-hex input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if COMMIT_HASH.is_match(trimmed) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    /// Normalize an optional raw commit value.
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    /// The revision string as passed to providers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated hash for display.
    pub fn short(&self) -> &str {
        let hash = self.0.trim_end_matches('^');
        &hash[..hash.len().min(Self::SHORT_LEN)]
    }

    /// The first parent of this revision (`{hash}^`).
    pub fn parent(&self) -> Self {
        Self(format!("{}^", self.0))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Global live-vs-historical state supplied by the timeline collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeTravelState {
    /// Whether the timeline cursor points into the past.
    pub is_historical_mode: bool,
    /// Raw commit value for the cursor position. Not trusted until parsed.
    pub commit_hash: Option<String>,
    /// Time of the cursor position.
    pub timestamp: Option<DateTime<Utc>>,
    /// Message of the commit under the cursor.
    pub commit_message: Option<String>,
}

impl TimeTravelState {
    /// The live state (no time travel).
    pub fn live() -> Self {
        Self::default()
    }

    /// A historical cursor at `commit_hash`.
    pub fn historical(
        commit_hash: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        commit_message: Option<String>,
    ) -> Self {
        Self {
            is_historical_mode: true,
            commit_hash: Some(commit_hash.into()),
            timestamp,
            commit_message,
        }
    }

    /// The normalized panel revision: set only in historical mode with a
    /// well-formed commit.
    pub fn revision(&self) -> Option<Revision> {
        if self.is_historical_mode {
            Revision::from_optional(self.commit_hash.as_deref())
        } else {
            None
        }
    }
}
