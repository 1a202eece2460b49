//! Command handle abstraction

use chrono::{DateTime, Local};
use makepanel_api::RunningCommand;
use makepanel_util::RunId;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle to one externally running recipe
///
/// Created by the launcher when the process has been spawned. Clones share
/// the liveness flag, so a snapshot taken from the slot still sees the exit
/// once the waiter records it.
#[derive(Debug, Clone)]
pub struct CommandHandle {
    pub run_id: RunId,

    /// Recipe the process was launched with
    pub name: String,

    /// Process ID of the group leader
    pub pid: u32,

    /// Process group ID (equal to `pid`, the child leads its own group)
    pub pgid: u32,

    pub started_at: DateTime<Local>,

    alive: Arc<AtomicBool>,
}

impl CommandHandle {
    pub fn new(run_id: RunId, name: impl Into<String>, pid: u32, pgid: u32) -> Self {
        Self {
            run_id,
            name: name.into(),
            pid,
            pgid,
            started_at: Local::now(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the process has not yet been observed to exit
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Record that the process has exited. Returns false if it was already
    /// recorded.
    pub fn mark_exited(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }

    pub fn view(&self) -> RunningCommand {
        RunningCommand {
            run_id: self.run_id,
            name: self.name.clone(),
            pid: self.pid,
            started_at: self.started_at,
        }
    }
}

/// Exit status of a launched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitStatus {
    /// Exit code if the process exited normally
    pub code: Option<i32>,

    /// Whether the process was signaled
    pub signaled: bool,

    /// Signal number if signaled (Unix)
    pub signal: Option<i32>,
}

impl ExitStatus {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            signaled: false,
            signal: None,
        }
    }

    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signaled: false,
            signal: None,
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signaled: true,
            signal: Some(signal),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitStatus::with_code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(sig) = status.signal() {
                return ExitStatus::signaled(sig);
            }
        }

        ExitStatus::with_code(-1)
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {}", code),
            (None, Some(sig)) => write!(f, "signal {}", sig),
            (None, None) => write!(f, "unknown status"),
        }
    }
}
