//! XDG-compliant path helpers.
//!
//! Respects `XDG_CONFIG_HOME`, falling back to `~/.config`.

use std::path::PathBuf;

/// Application directory name under the config base directory.
const APP_DIR: &str = "bdollar";

/// Returns the XDG config base directory.
///
/// Uses `XDG_CONFIG_HOME` if set, otherwise `~/.config`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

/// Returns the directory holding this application's config files.
pub fn app_config_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(APP_DIR))
}
