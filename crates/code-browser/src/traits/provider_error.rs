use thiserror::Error;

/// Errors a provider can report.
///
/// The browser never surfaces these to the user as failures: content errors
/// become the unavailable placeholder and listing errors become empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The requested file or tree does not exist at that revision.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The revision could not be resolved by the backend.
    #[error("Invalid revision: {0}")]
    InvalidRevision(String),

    /// Reading from the backend failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The provider is not available.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}
