//! Configuration for the code browser
//!
//! This crate provides:
//! - Configuration file discovery and loading (TOML)
//! - Application configuration (AppConfig)
//! - Config and cache directory paths

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{find_config_file, load_config_file, CONFIG_FILE};
pub use paths::{cache_dir, config_dir, APP_NAME};
