//! Providers backed by the git command line tool.

use crate::command::{run_git, split_nul};
use crate::DEFAULT_GIT_BINARY;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use code_browser::{
    ContentProvider, FileListProvider, ProviderError, Revision, TreeNode, TreeProvider,
};
use log::debug;
use std::io::ErrorKind;
use std::path::{Component, Path};

/// Timestamp and subject of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub subject: String,
}

/// Tree, file-list and content provider that shells out to `git`.
///
/// Live queries (no revision) see the working tree: tracked files plus
/// untracked files that are not ignored, with content read from disk.
#[derive(Debug, Clone)]
pub struct GitCli {
    git_binary: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_BINARY)
    }
}

impl GitCli {
    pub fn new(git_binary: impl Into<String>) -> Self {
        Self {
            git_binary: git_binary.into(),
        }
    }

    pub fn git_binary(&self) -> &str {
        &self.git_binary
    }

    async fn git(&self, repo_root: &str, args: &[&str]) -> Result<Vec<u8>> {
        run_git(&self.git_binary, repo_root, args).await
    }

    /// Top-level directory of the repository containing `dir`.
    pub async fn repo_root_of(&self, dir: &str) -> Result<String> {
        let stdout = self
            .git(dir, &["rev-parse", "--show-toplevel"])
            .await
            .with_context(|| format!("Not a git repository: {}", dir))?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    /// Resolve `revision` (any rev-parse syntax) to a full commit hash with
    /// its timestamp and subject.
    pub async fn commit_info(&self, repo_root: &str, revision: &str) -> Result<CommitInfo> {
        let stdout = self
            .git(
                repo_root,
                &["log", "-1", "--format=%H%x00%ct%x00%s", revision, "--"],
            )
            .await
            .with_context(|| format!("Unknown revision '{}'", revision))?;
        let line = String::from_utf8_lossy(&stdout);
        let mut fields = line.trim_end().splitn(3, '\0');

        let hash = fields.next().unwrap_or_default().to_string();
        if hash.is_empty() {
            anyhow::bail!("No commit found for '{}'", revision);
        }
        let timestamp = fields
            .next()
            .and_then(|secs| secs.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        let subject = fields.next().unwrap_or_default().to_string();

        Ok(CommitInfo {
            hash,
            timestamp,
            subject,
        })
    }

    /// All file paths at `revision`, or in the working tree when `None`.
    pub async fn list_paths(&self, repo_root: &str, revision: Option<&Revision>) -> Result<Vec<String>> {
        let stdout = match revision {
            Some(rev) => {
                self.git(
                    repo_root,
                    &["ls-tree", "-r", "-z", "--name-only", rev.as_str()],
                )
                .await?
            }
            None => {
                self.git(
                    repo_root,
                    &["ls-files", "-z", "--cached", "--others", "--exclude-standard"],
                )
                .await?
            }
        };

        let mut paths = split_nul(&stdout);
        // ls-files lists unmerged paths once per stage
        paths.dedup();
        debug!(
            "Listed {} paths in {} at {}",
            paths.len(),
            repo_root,
            revision.map_or("working tree", Revision::as_str)
        );
        Ok(paths)
    }

    /// Text of `path` at `revision`.
    pub async fn show(&self, repo_root: &str, path: &str, revision: &Revision) -> Result<String> {
        let spec = format!("{}:{}", revision, path);
        let stdout = self.git(repo_root, &["show", &spec]).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Reject absolute paths and paths escaping the repository.
fn check_relative(path: &str) -> Result<(), ProviderError> {
    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes || path.is_empty() {
        return Err(ProviderError::NotFound(path.to_string()));
    }
    Ok(())
}

/// Map a git failure onto the provider error kinds.
fn classify(err: anyhow::Error, subject: &str) -> ProviderError {
    let message = format!("{:#}", err);
    let lower = message.to_lowercase();

    if lower.contains("does not exist in") || lower.contains("exists on disk, but not in") {
        ProviderError::NotFound(subject.to_string())
    } else if lower.contains("invalid object name")
        || lower.contains("not a valid object name")
        || lower.contains("bad revision")
        || lower.contains("unknown revision")
    {
        ProviderError::InvalidRevision(message)
    } else {
        ProviderError::Io(message)
    }
}

#[async_trait]
impl TreeProvider for GitCli {
    async fn list_tree(
        &self,
        repo_root: &str,
        revision: Option<&Revision>,
    ) -> Result<TreeNode, ProviderError> {
        let paths = self
            .list_paths(repo_root, revision)
            .await
            .map_err(|e| classify(e, repo_root))?;
        Ok(TreeNode::from_paths(&paths))
    }
}

#[async_trait]
impl FileListProvider for GitCli {
    async fn list_files(
        &self,
        repo_root: &str,
        revision: Option<&Revision>,
    ) -> Result<Vec<String>, ProviderError> {
        self.list_paths(repo_root, revision)
            .await
            .map_err(|e| classify(e, repo_root))
    }
}

#[async_trait]
impl ContentProvider for GitCli {
    async fn read_at_revision(
        &self,
        repo_root: &str,
        path: &str,
        revision: Option<&Revision>,
    ) -> Result<String, ProviderError> {
        check_relative(path)?;

        match revision {
            Some(rev) => self
                .show(repo_root, path, rev)
                .await
                .map_err(|e| classify(e, path)),
            None => {
                let full = Path::new(repo_root).join(path);
                match tokio::fs::read(&full).await {
                    Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        Err(ProviderError::NotFound(path.to_string()))
                    }
                    Err(e) => Err(ProviderError::Io(format!("{}: {}", full.display(), e))),
                }
            }
        }
    }
}
