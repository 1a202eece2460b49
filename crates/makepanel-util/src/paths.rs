//! Default paths for makepanel
//!
//! The config file lives under the user's config directory:
//! - `$MAKEPANEL_CONFIG` if set
//! - `$XDG_CONFIG_HOME/makepanel/config.toml`
//! - `~/.config/makepanel/config.toml`
//!
//! Everything the panel serves or edits (static assets, the configs
//! directory, the makefile) is relative to the working directory unless the
//! config file says otherwise.

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const MAKEPANEL_CONFIG_ENV: &str = "MAKEPANEL_CONFIG";

/// Application subdirectory name
const APP_DIR: &str = "makepanel";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_CONFIGS_DIR: &str = "configs";
pub const DEFAULT_MAKEFILE: &str = "makefile";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$MAKEPANEL_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/makepanel/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/makepanel/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(MAKEPANEL_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking MAKEPANEL_CONFIG.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from(CONFIG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_config_toml() {
        let path = config_path_without_env();
        assert!(path.ends_with(CONFIG_FILENAME));
    }

    #[test]
    fn config_path_lives_in_app_dir() {
        let path = config_path_without_env();
        // Only the last-resort fallback has no parent directory
        if path.components().count() > 1 {
            assert!(path.to_string_lossy().contains(APP_DIR));
        }
    }
}
