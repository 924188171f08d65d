//! Data models for tabs, revisions and repository trees.

mod revision;
mod tab;
mod tree;
mod view_state;

pub use revision::{Revision, TimeTravelState};
pub use tab::{OpenOptions, Tab, TabId};
pub use tree::{breadcrumbs, FlatTreeEntry, SiblingEntry, TreeNode};
pub use view_state::ViewState;
