//! State management for the code browser.

mod baseline;
mod browser_state;
mod content_cache;
mod listing;
mod registry;
mod revision;
mod snapshot;

pub use baseline::{BaselineSource, DiffBaseline, PanelBaseline};
pub use browser_state::{BrowserOptions, CodeBrowserState, EditorProps};
pub(crate) use content_cache::InFlight;
pub use content_cache::{CachedContent, ContentCache, LoadTicket};
pub use listing::{Listing, ListingTicket, QueryKey};
pub use registry::{OpenKind, OpenOutcome, SnapshotExit, TabRegistry};
pub use revision::RevisionContext;
pub use snapshot::{SnapshotBanner, SnapshotCoordinator};
