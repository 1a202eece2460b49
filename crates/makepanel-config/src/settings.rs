//! Validated configuration structures

use crate::schema::{RawConfig, RawPanelConfig, RawRunnerConfig, RawVersionCheckConfig};
use makepanel_util::{DEFAULT_CONFIGS_DIR, DEFAULT_MAKEFILE, DEFAULT_STATIC_DIR};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_EXTENSION: &str = "toml";
pub const DEFAULT_RUNNER_PROGRAM: &str = "make";
pub const DEFAULT_VERSION_TIMEOUT: Duration = Duration::from_secs(3);

/// Validated configuration ready for use by the daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub bind: SocketAddr,
    pub static_dir: PathBuf,
    pub configs_dir: PathBuf,
    pub makefile: PathBuf,

    /// Extension (without the dot) that saved files always end in
    pub config_extension: String,

    pub runner: RunnerConfig,
    pub version_check: VersionCheckConfig,
}

impl PanelConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let RawPanelConfig {
            bind,
            static_dir,
            configs_dir,
            makefile,
            config_extension,
        } = raw.panel;

        Self {
            bind: bind
                .and_then(|b| b.parse().ok())
                .unwrap_or_else(default_bind),
            static_dir: static_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            configs_dir: configs_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIGS_DIR)),
            makefile: makefile.unwrap_or_else(|| PathBuf::from(DEFAULT_MAKEFILE)),
            config_extension: config_extension
                .unwrap_or_else(|| DEFAULT_CONFIG_EXTENSION.to_string()),
            runner: RunnerConfig::from_raw(raw.runner),
            version_check: VersionCheckConfig::from_raw(raw.version_check),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            configs_dir: PathBuf::from(DEFAULT_CONFIGS_DIR),
            makefile: PathBuf::from(DEFAULT_MAKEFILE),
            config_extension: DEFAULT_CONFIG_EXTENSION.to_string(),
            runner: RunnerConfig::default(),
            version_check: VersionCheckConfig::default(),
        }
    }
}

/// Recipe runner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl RunnerConfig {
    fn from_raw(raw: RawRunnerConfig) -> Self {
        Self {
            program: raw
                .program
                .unwrap_or_else(|| DEFAULT_RUNNER_PROGRAM.to_string()),
            args: raw.args,
            working_dir: raw.working_dir,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNNER_PROGRAM.to_string(),
            args: Vec::new(),
            working_dir: None,
        }
    }
}

/// Remote version check configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheckConfig {
    /// None disables the check
    pub url: Option<String>,
    pub timeout: Duration,
}

impl VersionCheckConfig {
    fn from_raw(raw: RawVersionCheckConfig) -> Self {
        Self {
            url: raw.url,
            timeout: raw
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_VERSION_TIMEOUT),
        }
    }
}

impl Default for VersionCheckConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: DEFAULT_VERSION_TIMEOUT,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}
