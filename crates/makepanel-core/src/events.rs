//! Events emitted by the supervisor

use makepanel_host_api::ExitStatus;
use makepanel_util::RunId;
use std::time::Duration;

/// How a run ended, as seen by its waiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process exited (normally or by signal)
    Exited(ExitStatus),

    /// Waiting on the process failed; the slot was cleared anyway
    WaitFailed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited(status) if status.is_success())
    }
}

/// Events emitted by the supervisor
#[derive(Debug, Clone)]
pub enum SupervisorEvent {
    /// A recipe was spawned and now holds the slot
    Started {
        run_id: RunId,
        name: String,
        pid: u32,
    },

    /// An interrupt was delivered to the running recipe's group
    StopRequested { run_id: RunId, name: String },

    /// The waiter observed exit and cleared the slot
    Finished {
        run_id: RunId,
        name: String,
        outcome: RunOutcome,
        duration: Duration,
    },
}
