//! Trait for reading file content at a revision.

use super::ProviderError;
use crate::model::Revision;
use async_trait::async_trait;

/// Reads the raw text of a file, live or at a revision.
///
/// # Example
///
/// ```ignore
/// struct GitShowProvider;
///
/// #[async_trait]
/// impl ContentProvider for GitShowProvider {
///     async fn read_at_revision(
///         &self,
///         repo_root: &str,
///         path: &str,
///         revision: Option<&Revision>,
///     ) -> Result<String, ProviderError> {
///         match revision {
///             Some(rev) => git_show(repo_root, &format!("{}:{}", rev, path)).await,
///             None => read_working_tree(repo_root, path).await,
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Read `path` at `revision`, or from the working tree when `revision`
    /// is `None`.
    async fn read_at_revision(
        &self,
        repo_root: &str,
        path: &str,
        revision: Option<&Revision>,
    ) -> Result<String, ProviderError>;

    /// Check if the provider is available.
    fn is_available(&self) -> bool {
        true
    }
}

/// A content provider for when no backend is configured.
pub struct NoOpContentProvider;

#[async_trait]
impl ContentProvider for NoOpContentProvider {
    async fn read_at_revision(
        &self,
        _repo_root: &str,
        _path: &str,
        _revision: Option<&Revision>,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(
            "Content loading is disabled".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}
