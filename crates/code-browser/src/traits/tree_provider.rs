//! Trait for listing the repository tree.

use super::ProviderError;
use crate::model::{Revision, TreeNode};
use async_trait::async_trait;

/// Lists the repository tree, live or at a revision.
#[async_trait]
pub trait TreeProvider: Send + Sync {
    /// List the full tree under `repo_root`.
    ///
    /// # Returns
    /// The root node (unnamed directory) with nested children.
    async fn list_tree(
        &self,
        repo_root: &str,
        revision: Option<&Revision>,
    ) -> Result<TreeNode, ProviderError>;

    /// Check if the provider is available.
    fn is_available(&self) -> bool {
        true
    }
}

/// A tree provider for when no backend is configured.
pub struct NoOpTreeProvider;

#[async_trait]
impl TreeProvider for NoOpTreeProvider {
    async fn list_tree(
        &self,
        _repo_root: &str,
        _revision: Option<&Revision>,
    ) -> Result<TreeNode, ProviderError> {
        Err(ProviderError::Unavailable(
            "Tree listing is disabled".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}
