use std::{
    env,
    path::{Path, PathBuf},
};

pub const CONFIG_FILE: &str = ".code-browser.toml";

/// Locate the config file
///
/// Searches for `.code-browser.toml` in:
/// 1. Current working directory
/// 2. Home directory
/// 3. The application config directory as `config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    first_existing(&candidates())
}

/// Load config file content from the first location that has one
///
/// Returns the path and content if found, None otherwise.
pub fn load_config_file() -> Option<(PathBuf, String)> {
    let path = find_config_file()?;
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some((path, content))
        }
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    if let Ok(dir) = crate::config_dir() {
        paths.push(dir.join("config.toml"));
    }
    paths
}

fn first_existing<P: AsRef<Path>>(candidates: &[P]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|path| path.as_ref())
        .find(|path| path.is_file())
        .map(Path::to_path_buf)
}
