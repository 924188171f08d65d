//! Git backed providers for the code browser
//!
//! This crate implements the `code-browser` provider traits on top of the
//! `git` command line tool. Historical queries go through `git ls-tree` and
//! `git show`; live queries list the working tree with `git ls-files` and
//! read files straight from disk.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │   TreeProvider / FileListProvider /              │
//! │   ContentProvider  (code-browser traits)         │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ GitCli          │         │ CachedProvider      │
//! │ (spawns git)    │◄────────│ (historical memo)   │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use code_browser::{ContentProvider, Revision};
//! use code_browser_git::{CachedProvider, GitCli};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let git = CachedProvider::new(GitCli::default());
//! let rev = Revision::parse("4b825dc").expect("well-formed hash");
//! let text = git.read_at_revision("/path/to/repo", "src/main.rs", Some(&rev)).await?;
//! # Ok(())
//! # }
//! ```

pub mod cached;
mod command;
pub mod git_cli;

/// Default git executable
pub const DEFAULT_GIT_BINARY: &str = "git";

pub use cached::{CacheStats, CachedProvider};
pub use git_cli::{CommitInfo, GitCli};
