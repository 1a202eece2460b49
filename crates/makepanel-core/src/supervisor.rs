//! Single-flight command supervisor

use makepanel_host_api::{
    CommandHandle, ExitWaiter, HostError, HostResult, Launched, ProcessLauncher,
};
use makepanel_util::RunId;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, broadcast, oneshot};
use tracing::{debug, error, info, warn};

use crate::{CommandSlot, RunOutcome, SupervisorEvent};

/// Errors returned to callers of the supervisor
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("No command provided")]
    EmptyName,

    #[error("A command is already running: {running}")]
    AlreadyRunning { running: String },

    #[error("No command is running")]
    NotRunning,

    #[error("Failed to start command: {0}")]
    Spawn(#[source] HostError),

    #[error("Failed to stop command: {0}")]
    Signal(#[source] HostError),
}

pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// A recipe that was spawned and registered
#[derive(Debug)]
pub struct Started {
    pub handle: CommandHandle,
    pub completion: RunCompletion,
}

/// A recipe whose process group was sent an interrupt
#[derive(Debug, Clone)]
pub struct Stopped {
    pub handle: CommandHandle,
}

/// Resolves with the run's outcome once its waiter has cleared the slot
///
/// Dropping it detaches: the waiter still runs and still clears the slot.
#[derive(Debug)]
pub struct RunCompletion {
    rx: oneshot::Receiver<RunOutcome>,
}

impl RunCompletion {
    /// Wait for the run to finish. None if the waiter task was torn down
    /// (runtime shutdown) before it could report.
    pub async fn wait(self) -> Option<RunOutcome> {
        self.rx.await.ok()
    }
}

/// Owns the start/stop/forward protocol for the one running recipe
pub struct Supervisor {
    launcher: Arc<dyn ProcessLauncher>,
    slot: Arc<CommandSlot>,

    /// Serializes starts across the spawn, so check-then-acquire cannot
    /// interleave. The slot guard itself stays short.
    launch_lock: Mutex<()>,

    events: broadcast::Sender<SupervisorEvent>,
}

impl Supervisor {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        let (events, _) = broadcast::channel(64);

        Self {
            launcher,
            slot: Arc::new(CommandSlot::new()),
            launch_lock: Mutex::new(()),
            events,
        }
    }

    /// Subscribe to supervisor events
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the running command, if any
    pub fn status(&self) -> Option<CommandHandle> {
        self.slot.peek()
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }

    /// Start `name` if nothing is running.
    ///
    /// Returns as soon as the process is spawned. A background waiter owns
    /// the exit and clears the slot whatever the outcome.
    pub async fn start(&self, name: &str) -> SupervisorResult<Started> {
        if name.trim().is_empty() {
            return Err(SupervisorError::EmptyName);
        }

        let _launch = self.launch_lock.lock().await;

        if let Some(running) = self.slot.peek() {
            debug!(requested = %name, running = %running.name, "Start refused, slot occupied");
            return Err(SupervisorError::AlreadyRunning {
                running: running.name,
            });
        }

        let run_id = RunId::new();
        let Launched { handle, exit } = self.launcher.launch(run_id, name).await.map_err(|e| {
            warn!(recipe = %name, error = %e, "Failed to spawn recipe");
            SupervisorError::Spawn(e)
        })?;

        let acquired = self.slot.try_acquire(handle.clone());

        let (done_tx, done_rx) = oneshot::channel();
        let waiter = Waiter {
            handle: handle.clone(),
            slot: self.slot.clone(),
            events: self.events.clone(),
            started: Instant::now(),
        };
        tokio::spawn(async move {
            let outcome = waiter.run(exit).await;
            let _ = done_tx.send(outcome);
        });

        if !acquired {
            // Unreachable while starts hold the launch lock; do not leave an
            // untracked process behind
            error!(run_id = %run_id, recipe = %name, "Slot taken during launch, interrupting new process");
            let _ = self.launcher.signal(&handle);
            let running = self.slot.peek().map(|h| h.name).unwrap_or_default();
            return Err(SupervisorError::AlreadyRunning { running });
        }

        info!(run_id = %run_id, recipe = %name, pid = handle.pid, "Command started");
        let _ = self.events.send(SupervisorEvent::Started {
            run_id,
            name: handle.name.clone(),
            pid: handle.pid,
        });

        Ok(Started {
            handle,
            completion: RunCompletion { rx: done_rx },
        })
    }

    /// Interrupt the running command's process group.
    ///
    /// Does not clear the slot; the waiter does that once exit is observed.
    pub fn stop(&self) -> SupervisorResult<Stopped> {
        let handle = self.slot.peek().ok_or(SupervisorError::NotRunning)?;

        self.signal_live(&handle).map_err(|e| {
            warn!(run_id = %handle.run_id, recipe = %handle.name, error = %e, "Stop signal failed");
            SupervisorError::Signal(e)
        })?;

        info!(run_id = %handle.run_id, recipe = %handle.name, pgid = handle.pgid, "Stop requested");
        let _ = self.events.send(SupervisorEvent::StopRequested {
            run_id: handle.run_id,
            name: handle.name.clone(),
        });

        Ok(Stopped { handle })
    }

    /// Forward a panel-level interrupt to the running command, if any.
    ///
    /// Never waits for the command to exit. Returns None when nothing was
    /// running, otherwise the delivery result.
    pub fn forward_interrupt(&self) -> Option<HostResult<CommandHandle>> {
        let handle = self.slot.take_for_signal()?;

        let result = self.signal_live(&handle);
        match &result {
            Ok(()) => {
                info!(run_id = %handle.run_id, recipe = %handle.name, pgid = handle.pgid, "Interrupt forwarded");
                let _ = self.events.send(SupervisorEvent::StopRequested {
                    run_id: handle.run_id,
                    name: handle.name.clone(),
                });
            }
            Err(e) => {
                warn!(run_id = %handle.run_id, recipe = %handle.name, error = %e, "Interrupt not forwarded");
            }
        }

        Some(result.map(|()| handle))
    }

    /// Signal the group unless its leader is already known to be reaped.
    ///
    /// The waiter marks the handle exited before releasing the slot, so a
    /// handle still in the slot but marked exited names a pgid that may be
    /// reused.
    fn signal_live(&self, handle: &CommandHandle) -> HostResult<()> {
        if !handle.is_alive() {
            return Err(HostError::ProcessGone { pgid: handle.pgid });
        }
        self.launcher.signal(handle)
    }

    /// Resolve once no command holds the slot
    pub async fn wait_idle(&self) {
        let mut events = self.events.subscribe();
        loop {
            if !self.slot.is_running() {
                return;
            }
            match events.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return,
            }
        }
    }
}

/// Background owner of one run's exit
struct Waiter {
    handle: CommandHandle,
    slot: Arc<CommandSlot>,
    events: broadcast::Sender<SupervisorEvent>,
    started: Instant,
}

impl Waiter {
    async fn run(self, exit: ExitWaiter) -> RunOutcome {
        let outcome = match exit.await {
            Ok(status) => {
                if status.is_success() {
                    info!(run_id = %self.handle.run_id, recipe = %self.handle.name, "Command finished");
                } else {
                    warn!(run_id = %self.handle.run_id, recipe = %self.handle.name, status = %status, "Command exited unsuccessfully");
                }
                RunOutcome::Exited(status)
            }
            Err(e) => {
                warn!(run_id = %self.handle.run_id, recipe = %self.handle.name, error = %e, "Waiting on command failed");
                RunOutcome::WaitFailed(e.to_string())
            }
        };

        // Marked before release, so stop never targets this pgid from here
        // on. Between the reap inside `exit` and this line a signal can
        // still hit an empty group, which reports ESRCH.
        self.handle.mark_exited();
        self.slot.release(&self.handle.run_id);

        let _ = self.events.send(SupervisorEvent::Finished {
            run_id: self.handle.run_id,
            name: self.handle.name.clone(),
            outcome: outcome.clone(),
            duration: self.started.elapsed(),
        });

        outcome
    }
}
