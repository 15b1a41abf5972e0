//! Files movieo keeps in its config directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory name under the XDG config root.
const APP_DIR: &str = "movieo";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Log file written while the browser owns the terminal.
pub const BROWSE_LOG_FILE: &str = "browse.log";

/// Resolves the config directory.
///
/// Lookup order: `dir`, then `$XDG_CONFIG_HOME/movieo`, then
/// `$HOME/.config/movieo`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither variable gives a usable
/// location.
pub fn resolve_config_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_dir_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

/// Resolves the config file path inside [`resolve_config_dir`].
///
/// # Errors
///
/// Same as [`resolve_config_dir`].
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(resolve_config_dir(dir)?.join(CONFIG_FILE))
}

fn config_dir_from(
    dir: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.to_path_buf());
    }

    // Relative XDG_CONFIG_HOME values are invalid and ignored.
    if let Some(root) = xdg_config_home
        .map(PathBuf::from)
        .filter(|root| root.is_absolute())
    {
        return Ok(root.join(APP_DIR));
    }

    let home = home
        .filter(|home| !home.is_empty())
        .context("neither XDG_CONFIG_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}
