//! Process management utilities

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

use makepanel_host_api::{ExitStatus, HostError, HostResult};

/// Managed child process leading its own process group
#[derive(Debug)]
pub struct ManagedProcess {
    pub child: Child,
    pub pid: u32,
    pub pgid: u32,
}

impl ManagedProcess {
    /// Spawn a new process in its own process group.
    ///
    /// stdin is closed; stdout and stderr are inherited from the panel so the
    /// recipe's output shows up next to the panel's own logs.
    pub fn spawn(program: &str, args: &[String], cwd: Option<&Path>) -> HostResult<Self> {
        if program.is_empty() {
            return Err(HostError::SpawnFailed("Empty program".into()));
        }

        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        // The child becomes the leader of a new process group, so signalling
        // the group never reaches the panel itself
        cmd.process_group(0);
        cmd.kill_on_drop(false);

        let child = cmd.spawn().map_err(|e| {
            HostError::SpawnFailed(format!("Failed to spawn {}: {}", program, e))
        })?;

        let pid = child
            .id()
            .ok_or_else(|| HostError::SpawnFailed(format!("{} exited before it got a pid", program)))?;
        let pgid = pid; // process_group(0): pid == pgid

        debug!(pid = pid, pgid = pgid, program = %program, "Process spawned");

        Ok(Self { child, pid, pgid })
    }

    /// Wait for the process to exit
    pub async fn wait(&mut self) -> HostResult<ExitStatus> {
        self.child
            .wait()
            .await
            .map(ExitStatus::from)
            .map_err(|e| HostError::WaitFailed(e.to_string()))
    }
}

/// Send SIGINT to every process in the group
pub fn interrupt_group(pgid: u32) -> HostResult<()> {
    let target = i32::try_from(pgid)
        .map_err(|_| HostError::SignalFailed(format!("Invalid process group {}", pgid)))?;
    let group = Pid::from_raw(-target); // Negative for process group

    match signal::kill(group, Signal::SIGINT) {
        Ok(()) => {
            debug!(pgid = pgid, "Sent SIGINT to process group");
            Ok(())
        }
        Err(Errno::ESRCH) => Err(HostError::ProcessGone { pgid }),
        Err(e) => Err(HostError::SignalFailed(format!(
            "Failed to send SIGINT to group {}: {}",
            pgid, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_simple_process() {
        let mut proc = ManagedProcess::spawn("true", &[], None).unwrap();

        assert_eq!(proc.pid, proc.pgid);
        let status = proc.wait().await.unwrap();
        assert!(status.is_success());
    }

    #[tokio::test]
    async fn spawn_reports_exit_code() {
        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let mut proc = ManagedProcess::spawn("sh", &args, None).unwrap();

        let status = proc.wait().await.unwrap();
        assert_eq!(status.code, Some(3));
    }

    #[tokio::test]
    async fn spawn_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec!["-c".to_string(), "touch marker".to_string()];

        let mut proc = ManagedProcess::spawn("sh", &args, Some(dir.path())).unwrap();
        proc.wait().await.unwrap();

        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn spawn_missing_program_fails() {
        let result = ManagedProcess::spawn("/nonexistent/makepanel-test-program", &[], None);
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn interrupt_sleeping_process() {
        let args = vec!["60".to_string()];
        let mut proc = ManagedProcess::spawn("sleep", &args, None).unwrap();

        interrupt_group(proc.pgid).unwrap();

        let status = tokio::time::timeout(std::time::Duration::from_secs(5), proc.wait())
            .await
            .expect("sleep should exit after SIGINT")
            .unwrap();
        assert_eq!(status.signal, Some(Signal::SIGINT as i32));

        // The group is empty once the leader is reaped
        assert!(matches!(
            interrupt_group(proc.pgid),
            Err(HostError::ProcessGone { .. })
        ));
    }
}
