//! Mock launcher for testing

use async_trait::async_trait;
use makepanel_util::RunId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

use crate::{CommandHandle, ExitStatus, HostError, HostResult, Launched, ProcessLauncher};

/// SIGINT, reported as the exit signal of mock processes that honor a stop
const MOCK_INTERRUPT: i32 = 2;

/// Mock process state for testing
#[derive(Debug)]
struct MockProcess {
    exit_tx: Option<oneshot::Sender<HostResult<ExitStatus>>>,
    signals: usize,
}

/// Mock launcher for unit/integration testing
///
/// Processes never exit on their own: a test finishes them with
/// [`MockLauncher::finish`], or sets `exit_on_signal` so that an interrupt
/// ends them.
pub struct MockLauncher {
    next_pid: AtomicU32,
    processes: Arc<Mutex<HashMap<RunId, MockProcess>>>,
    launched: Arc<Mutex<Vec<String>>>,

    /// Configure launch to fail
    pub fail_spawn: AtomicBool,

    /// Configure signal delivery to fail
    pub fail_signal: AtomicBool,

    /// Exit with SIGINT status as soon as a signal arrives
    pub exit_on_signal: AtomicBool,

    /// Delay inside launch (widens start races in tests)
    pub launch_delay: Mutex<Option<Duration>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self {
            next_pid: AtomicU32::new(1000),
            processes: Arc::new(Mutex::new(HashMap::new())),
            launched: Arc::new(Mutex::new(Vec::new())),
            fail_spawn: AtomicBool::new(false),
            fail_signal: AtomicBool::new(false),
            exit_on_signal: AtomicBool::new(false),
            launch_delay: Mutex::new(None),
        }
    }

    pub fn with_exit_on_signal(self) -> Self {
        self.exit_on_signal.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_launch_delay(self, delay: Duration) -> Self {
        *self.launch_delay.lock().unwrap() = Some(delay);
        self
    }

    /// Names passed to every successful launch, in order
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }

    /// Number of processes that have not exited yet
    pub fn running_count(&self) -> usize {
        self.processes
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.exit_tx.is_some())
            .count()
    }

    /// Number of signals delivered to a run
    pub fn signals_for(&self, run_id: &RunId) -> usize {
        self.processes
            .lock()
            .unwrap()
            .get(run_id)
            .map(|p| p.signals)
            .unwrap_or(0)
    }

    /// Simulate process exit. Returns false if the run is unknown or has
    /// already exited.
    pub fn finish(&self, run_id: &RunId, status: ExitStatus) -> bool {
        self.complete(run_id, Ok(status))
    }

    /// Simulate a failure of the wait itself
    pub fn fail_wait(&self, run_id: &RunId, message: &str) -> bool {
        self.complete(run_id, Err(HostError::WaitFailed(message.into())))
    }

    /// Finish every process still running
    pub fn finish_all(&self, status: ExitStatus) {
        let mut processes = self.processes.lock().unwrap();
        for process in processes.values_mut() {
            if let Some(tx) = process.exit_tx.take() {
                let _ = tx.send(Ok(status.clone()));
            }
        }
    }

    fn complete(&self, run_id: &RunId, result: HostResult<ExitStatus>) -> bool {
        let mut processes = self.processes.lock().unwrap();
        match processes.get_mut(run_id).and_then(|p| p.exit_tx.take()) {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessLauncher for MockLauncher {
    async fn launch(&self, run_id: RunId, name: &str) -> HostResult<Launched> {
        let delay = *self.launch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(HostError::SpawnFailed("Mock spawn failure".into()));
        }

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let handle = CommandHandle::new(run_id, name, pid, pid);
        let (exit_tx, exit_rx) = oneshot::channel();

        self.processes.lock().unwrap().insert(
            run_id,
            MockProcess {
                exit_tx: Some(exit_tx),
                signals: 0,
            },
        );
        self.launched.lock().unwrap().push(name.to_string());

        let exit = Box::pin(async move {
            exit_rx
                .await
                .unwrap_or_else(|_| Err(HostError::WaitFailed("mock process dropped".into())))
        });

        Ok(Launched { handle, exit })
    }

    fn signal(&self, handle: &CommandHandle) -> HostResult<()> {
        if self.fail_signal.load(Ordering::SeqCst) {
            return Err(HostError::SignalFailed("Mock signal failure".into()));
        }

        let mut processes = self.processes.lock().unwrap();
        let process = processes
            .get_mut(&handle.run_id)
            .filter(|p| p.exit_tx.is_some())
            .ok_or(HostError::ProcessGone { pgid: handle.pgid })?;

        process.signals += 1;
        if self.exit_on_signal.load(Ordering::SeqCst)
            && let Some(tx) = process.exit_tx.take()
        {
            let _ = tx.send(Ok(ExitStatus::signaled(MOCK_INTERRUPT)));
        }

        Ok(())
    }
}
