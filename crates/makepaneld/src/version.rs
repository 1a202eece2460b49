//! Remote release check

use makepanel_api::{VersionCheckState, VersionInfo};
use makepanel_config::VersionCheckConfig;
use serde::Deserialize;
use tracing::{debug, warn};

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    tag_name: String,
}

/// Checks a release feed for a newer panel version
#[derive(Debug, Clone)]
pub struct VersionChecker {
    config: VersionCheckConfig,
}

impl VersionChecker {
    pub fn new(config: VersionCheckConfig) -> Self {
        Self { config }
    }

    /// Query the feed once. Never fails: problems are reported in the
    /// returned state.
    pub async fn check(&self) -> VersionInfo {
        let current = normalize_version(CURRENT_VERSION).unwrap_or_else(|| CURRENT_VERSION.into());

        let Some(url) = self.config.url.as_deref() else {
            return VersionInfo {
                current,
                latest: None,
                update_available: false,
                state: VersionCheckState::Disabled,
            };
        };

        match self.fetch_latest(url).await {
            Ok(tag) => {
                let latest = normalize_version(&tag).unwrap_or(tag);
                let update_available = is_newer(&latest, &current);
                debug!(current = %current, latest = %latest, update_available, "Version checked");
                VersionInfo {
                    current,
                    latest: Some(latest),
                    update_available,
                    state: VersionCheckState::Checked,
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Version check failed");
                VersionInfo {
                    current,
                    latest: None,
                    update_available: false,
                    state: VersionCheckState::Failed,
                }
            }
        }
    }

    async fn fetch_latest(&self, url: &str) -> reqwest::Result<String> {
        let client = reqwest::Client::builder()
            .user_agent(format!("makepanel/{}", CURRENT_VERSION))
            .timeout(self.config.timeout)
            .build()?;
        let payload: ReleaseResponse = client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(payload.tag_name)
    }
}

/// Strip a leading `v` and any pre-release or build suffix
pub fn normalize_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('v');
    let no_build = trimmed.split('+').next().unwrap_or(trimmed);
    let no_pre = no_build.split('-').next().unwrap_or(no_build);
    if no_pre.is_empty() {
        None
    } else {
        Some(no_pre.to_string())
    }
}

pub fn version_tuple(raw: &str) -> Option<(u64, u64, u64)> {
    let normalized = normalize_version(raw)?;
    let mut parts = normalized.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().unwrap_or("0").parse().ok()?;
    let patch = parts.next().unwrap_or("0").parse().ok()?;
    Some((major, minor, patch))
}

fn is_newer(latest: &str, current: &str) -> bool {
    match (version_tuple(latest), version_tuple(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => false,
    }
}
