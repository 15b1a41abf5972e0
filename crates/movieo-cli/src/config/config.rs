//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog request settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Interactive browser settings.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// Catalog request settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Response language (e.g. `en-US`, `ja-JP`).
    pub language: String,
    /// Include adult titles in lists.
    pub include_adult: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            include_adult: false,
        }
    }
}

/// Browser timings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowseConfig {
    /// Banner autoplay period in milliseconds.
    pub autoplay_interval_ms: u64,
    /// Search input quiet window in milliseconds.
    pub debounce_ms: u64,
    /// Rows before the end of a list at which the next page is requested.
    pub scroll_margin: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: 5000,
            debounce_ms: 500,
            scroll_margin: 5,
        }
    }
}

impl BrowseConfig {
    /// Banner autoplay period.
    #[must_use]
    pub const fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    /// Search debounce window.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Rejects zero timings.
    fn validate(&self) -> Result<()> {
        ensure!(
            self.autoplay_interval_ms > 0,
            "browse.autoplay_interval_ms must be greater than 0"
        );
        ensure!(
            self.debounce_ms > 0,
            "browse.debounce_ms must be greater than 0"
        );
        Ok(())
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if a browse timing is zero.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .browse
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.catalog.language, "en-US");
        assert!(!config.catalog.include_adult);
        assert_eq!(config.browse.autoplay_interval(), Duration::from_secs(5));
        assert_eq!(config.browse.debounce(), Duration::from_millis(500));
        assert_eq!(config.browse.scroll_margin, 5);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[catalog]
language = "ja-JP"
include_adult = true

[browse]
autoplay_interval_ms = 8000
debounce_ms = 300
scroll_margin = 2
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.catalog.language, "ja-JP");
        assert!(config.catalog.include_adult);
        assert_eq!(config.browse.autoplay_interval(), Duration::from_secs(8));
        assert_eq!(config.browse.debounce(), Duration::from_millis(300));
        assert_eq!(config.browse.scroll_margin, 2);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse]\ndebounce_ms = 250\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.catalog, CatalogConfig::default());
        assert_eq!(config.browse.debounce_ms, 250);
        assert_eq!(config.browse.autoplay_interval_ms, 5000);
    }

    #[test]
    fn test_load_empty_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn test_load_rejects_zero_autoplay_interval() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse]\nautoplay_interval_ms = 0\n").unwrap();

        // Act
        let err = AppConfig::load(&path).unwrap_err();

        // Assert
        assert!(err.to_string().contains("invalid config"));
        assert!(format!("{err:#}").contains("autoplay_interval_ms must be greater than 0"));
    }

    #[test]
    fn test_load_rejects_zero_debounce() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse]\ndebounce_ms = 0\n").unwrap();

        // Act
        let err = AppConfig::load(&path).unwrap_err();

        // Assert
        assert!(format!("{err:#}").contains("debounce_ms must be greater than 0"));
    }
}
