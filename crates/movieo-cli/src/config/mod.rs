//! Application configuration module.
//!
//! Manages the TOML config file holding catalog request settings and
//! browser timings. The API token is never stored here.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, BrowseConfig, CatalogConfig};
pub use paths::{BROWSE_LOG_FILE, resolve_config_dir, resolve_config_path};
