//! Trait for the flat file list behind quick-open.

use super::ProviderError;
use crate::model::Revision;
use async_trait::async_trait;

/// Lists every file path in the repository, live or at a revision.
#[async_trait]
pub trait FileListProvider: Send + Sync {
    async fn list_files(
        &self,
        repo_root: &str,
        revision: Option<&Revision>,
    ) -> Result<Vec<String>, ProviderError>;

    /// Check if the provider is available.
    fn is_available(&self) -> bool {
        true
    }
}

/// A file list provider for when quick-open is disabled.
pub struct NoOpFileListProvider;

#[async_trait]
impl FileListProvider for NoOpFileListProvider {
    async fn list_files(
        &self,
        _repo_root: &str,
        _revision: Option<&Revision>,
    ) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Unavailable(
            "File listing is disabled".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}
