//! Application configuration
//!
//! Configuration loaded from `.code-browser.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration loaded from `.code-browser.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Repository to browse when none is given on the command line
    #[serde(default)]
    pub repo_root: Option<String>,

    /// Text shown in place of file content that could not be loaded
    #[serde(default = "default_unavailable_placeholder")]
    pub unavailable_placeholder: String,

    /// Compare pinned files against their version in the parent commit
    #[serde(default = "default_load_parent_baseline")]
    pub load_parent_baseline: bool,

    /// Maximum number of quick-open results
    #[serde(default = "default_quick_open_limit")]
    pub quick_open_limit: usize,

    /// Git executable used by the providers
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

fn default_unavailable_placeholder() -> String {
    "// Unable to load file content".to_string()
}

fn default_load_parent_baseline() -> bool {
    true
}

fn default_quick_open_limit() -> usize {
    20
}

fn default_git_binary() -> String {
    "git".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repo_root: None,
            unavailable_placeholder: default_unavailable_placeholder(),
            load_parent_baseline: default_load_parent_baseline(),
            quick_open_limit: default_quick_open_limit(),
            git_binary: default_git_binary(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some((path, content)) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {}: {}", path.display(), e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicit path
    ///
    /// Unlike [`AppConfig::load`], a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded app config from {}", path.display());
        Ok(config)
    }
}
