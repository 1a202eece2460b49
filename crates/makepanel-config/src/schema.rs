//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// HTTP surface and served files
    #[serde(default)]
    pub panel: RawPanelConfig,

    /// How recipes are run
    #[serde(default)]
    pub runner: RawRunnerConfig,

    /// Remote version check
    #[serde(default)]
    pub version_check: RawVersionCheckConfig,
}

/// Panel-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPanelConfig {
    /// Listen address (default: 127.0.0.1:8080)
    pub bind: Option<String>,

    /// Directory served under /static
    pub static_dir: Option<PathBuf>,

    /// Directory of editable configuration files
    pub configs_dir: Option<PathBuf>,

    /// Makefile scanned for recipes
    pub makefile: Option<PathBuf>,

    /// Extension appended to saved files that lack it (default: toml)
    pub config_extension: Option<String>,
}

/// Recipe runner settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRunnerConfig {
    /// Program to run (default: make)
    pub program: Option<String>,

    /// Arguments placed before the recipe name
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory of the recipe process
    pub working_dir: Option<PathBuf>,
}

/// Version check settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawVersionCheckConfig {
    /// Release document URL; no URL disables the check
    pub url: Option<String>,

    /// Request timeout in seconds (default: 3)
    pub timeout_secs: Option<u64>,
}
