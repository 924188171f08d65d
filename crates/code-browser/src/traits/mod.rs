//! Collaborator traits for the data the browser cannot produce itself.

mod content_provider;
mod file_list_provider;
mod provider_error;
mod tree_provider;

pub use content_provider::{ContentProvider, NoOpContentProvider};
pub use file_list_provider::{FileListProvider, NoOpFileListProvider};
pub use provider_error::ProviderError;
pub use tree_provider::{NoOpTreeProvider, TreeProvider};
