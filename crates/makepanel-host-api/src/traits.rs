//! Process launcher traits

use async_trait::async_trait;
use makepanel_util::RunId;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::{CommandHandle, ExitStatus};

/// Errors from launcher operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Signal failed: {0}")]
    SignalFailed(String),

    #[error("Process group {pgid} no longer exists")]
    ProcessGone { pgid: u32 },

    #[error("Wait failed: {0}")]
    WaitFailed(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// Resolves once the launched process has exited
pub type ExitWaiter = Pin<Box<dyn Future<Output = HostResult<ExitStatus>> + Send + 'static>>;

/// A freshly spawned process: its handle and the future that observes its exit
pub struct Launched {
    pub handle: CommandHandle,
    pub exit: ExitWaiter,
}

impl std::fmt::Debug for Launched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launched")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Launcher trait - implemented by platform-specific launchers
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Start the named recipe as the leader of a new process group.
    ///
    /// Returns as soon as the process exists; the returned exit future is
    /// the only way to observe its termination.
    async fn launch(&self, run_id: RunId, name: &str) -> HostResult<Launched>;

    /// Send an interrupt to every process in the handle's group
    fn signal(&self, handle: &CommandHandle) -> HostResult<()>;
}
