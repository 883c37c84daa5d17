//! User-level configuration.
//!
//! An optional TOML file under the platform config directory carries the
//! store path override and the default acting user. Everything degrades to
//! defaults when the file is absent.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `$XDG_CONFIG_HOME/focusmate/config.toml` (or the platform equivalent).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Store path override; flags and `FOCUSMATE_DB` still win over this.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// Acting user applied when a command omits `--user`.
    #[serde(default)]
    pub default_user: Option<i64>,
}

/// Load the user config, defaulting when no file exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("focusmate/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Default on-disk location for the store when nothing overrides it.
#[must_use]
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("focusmate/focusmate.sqlite3"))
}
