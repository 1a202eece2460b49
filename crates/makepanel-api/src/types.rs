//! Shared view types

use chrono::{DateTime, Local};
use makepanel_util::RunId;
use serde::{Deserialize, Serialize};

/// What the panel reports about the command slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStatus {
    pub running: bool,
    pub command: Option<RunningCommand>,
}

impl CommandStatus {
    pub fn idle() -> Self {
        Self {
            running: false,
            command: None,
        }
    }

    pub fn running(command: RunningCommand) -> Self {
        Self {
            running: true,
            command: Some(command),
        }
    }
}

/// The command currently held by the slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningCommand {
    pub run_id: RunId,
    pub name: String,
    pub pid: u32,
    pub started_at: DateTime<Local>,
}

/// Result of a remote version check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version of the running panel
    pub current: String,
    /// Latest published version, if the check succeeded
    pub latest: Option<String>,
    pub update_available: bool,
    pub state: VersionCheckState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionCheckState {
    /// No release URL configured
    Disabled,
    /// Remote answered and was parsed
    Checked,
    /// Remote unreachable or answered with something unparseable
    Failed,
}
