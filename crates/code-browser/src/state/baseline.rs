//! Diff baseline ("before" content) resolution.

use crate::model::Tab;

/// Previous content supplied for the whole panel by the surrounding page.
///
/// Only applies to the file it was supplied for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelBaseline {
    /// Path the panel-level baseline belongs to.
    pub current_file: Option<String>,
    pub previous_content: Option<String>,
}

impl PanelBaseline {
    pub fn new(current_file: impl Into<String>, previous_content: impl Into<String>) -> Self {
        Self {
            current_file: Some(current_file.into()),
            previous_content: Some(previous_content.into()),
        }
    }

    fn for_path(&self, path: &str) -> Option<&str> {
        match &self.current_file {
            Some(file) if file == path => self.previous_content.as_deref(),
            _ => None,
        }
    }
}

/// Where a resolved baseline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineSource {
    /// The tab's own supplied or loaded previous content.
    Tab,
    /// The panel-level baseline for the same path.
    Panel,
    None,
}

/// The comparison content for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffBaseline<'a> {
    pub previous_content: Option<&'a str>,
    pub source: BaselineSource,
    /// A baseline exists and differs from the current content.
    pub has_diff_data: bool,
}

impl<'a> DiffBaseline<'a> {
    /// Resolve the baseline for `tab`.
    ///
    /// The tab's own previous content wins; otherwise the panel baseline is
    /// used only when its file is the tab's path. `content` is the tab's
    /// current text, `None` while not loaded or unavailable.
    pub fn resolve(tab: &'a Tab, content: Option<&str>, panel: &'a PanelBaseline) -> Self {
        let (previous_content, source) = match tab.previous_content.as_deref() {
            Some(own) => (Some(own), BaselineSource::Tab),
            None => match panel.for_path(&tab.path) {
                Some(shared) => (Some(shared), BaselineSource::Panel),
                None => (None, BaselineSource::None),
            },
        };

        let has_diff_data = match (previous_content, content) {
            (Some(previous), Some(current)) => previous != current,
            _ => false,
        };

        Self {
            previous_content,
            source,
            has_diff_data,
        }
    }
}
