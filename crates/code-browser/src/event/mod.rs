//! Events emitted by the browser state for the orchestrator to handle.

mod browser_event;

pub use browser_event::{BrowserEvent, ContentRequest, ListingRequest};
