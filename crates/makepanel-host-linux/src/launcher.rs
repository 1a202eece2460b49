//! Linux launcher implementation

use async_trait::async_trait;
use makepanel_host_api::{CommandHandle, HostError, HostResult, Launched, ProcessLauncher};
use makepanel_util::RunId;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::process::{ManagedProcess, interrupt_group};

/// How a recipe name turns into a command line
///
/// The recipe name is appended after `args`, so the default spec runs
/// `make <name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn make() -> Self {
        Self {
            program: "make".into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn argv_for(&self, name: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(name.to_string());
        args
    }
}

impl Default for LaunchSpec {
    fn default() -> Self {
        Self::make()
    }
}

/// Linux launcher: one process group per recipe run
pub struct LinuxLauncher {
    spec: LaunchSpec,
}

impl LinuxLauncher {
    pub fn new(spec: LaunchSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &LaunchSpec {
        &self.spec
    }
}

impl Default for LinuxLauncher {
    fn default() -> Self {
        Self::new(LaunchSpec::make())
    }
}

#[async_trait]
impl ProcessLauncher for LinuxLauncher {
    async fn launch(&self, run_id: RunId, name: &str) -> HostResult<Launched> {
        // The name is the last argv entry; it must never parse as an option
        if name.starts_with('-') {
            warn!(run_id = %run_id, recipe = %name, "Refusing option-like recipe name");
            return Err(HostError::SpawnFailed(format!(
                "Recipe name '{}' looks like an option",
                name
            )));
        }

        let args = self.spec.argv_for(name);
        let mut proc =
            ManagedProcess::spawn(&self.spec.program, &args, self.spec.working_dir.as_deref())?;

        let handle = CommandHandle::new(run_id, name, proc.pid, proc.pgid);

        info!(
            run_id = %run_id,
            pid = proc.pid,
            pgid = proc.pgid,
            program = %self.spec.program,
            recipe = %name,
            "Spawned recipe"
        );

        let exit = Box::pin(async move { proc.wait().await });

        Ok(Launched { handle, exit })
    }

    fn signal(&self, handle: &CommandHandle) -> HostResult<()> {
        interrupt_group(handle.pgid).inspect_err(|e| {
            warn!(run_id = %handle.run_id, pgid = handle.pgid, error = %e, "Interrupt not delivered");
        })
    }
}
