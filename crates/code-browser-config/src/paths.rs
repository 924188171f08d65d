//! Configuration and cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/code-browser/`, `~/.cache/code-browser/`
//! - macOS: `~/Library/Application Support/code-browser/`, `~/Library/Caches/code-browser/`
//! - Windows: `%APPDATA%\code-browser\`, `%LOCALAPPDATA%\code-browser\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const APP_NAME: &str = "code-browser";

/// Get the application config directory (not created)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create cache directory {}", dir.display()))?;
    Ok(dir)
}
