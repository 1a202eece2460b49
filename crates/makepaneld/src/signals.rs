//! Process signals received by the panel itself

use anyhow::{Context, Result};
use makepanel_core::Supervisor;
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::{info, warn};

/// Exit status of a panel stopped by a signal (128 + SIGINT)
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Hangup,
}

impl ShutdownSignal {
    /// Conventional 128 + signal number
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownSignal::Interrupt => INTERRUPTED_EXIT_CODE,
            ShutdownSignal::Terminate => 143,
            ShutdownSignal::Hangup => 129,
        }
    }
}

/// SIGINT, SIGTERM and SIGHUP handlers, installed once at startup
pub struct ShutdownSignals {
    sigint: Signal,
    sigterm: Signal,
    sighup: Signal,
}

impl ShutdownSignals {
    pub fn install() -> Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?,
            sigterm: signal(SignalKind::terminate())
                .context("Failed to create SIGTERM handler")?,
            sighup: signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?,
        })
    }

    /// Resolve on the first signal received
    pub async fn recv(&mut self) -> ShutdownSignal {
        let received = tokio::select! {
            _ = self.sigint.recv() => ShutdownSignal::Interrupt,
            _ = self.sigterm.recv() => ShutdownSignal::Terminate,
            _ = self.sighup.recv() => ShutdownSignal::Hangup,
        };

        info!(signal = ?received, "Shutdown signal received");
        received
    }
}

/// What happened to the running command when the panel was interrupted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardReport {
    Idle,
    Forwarded { name: String },
    Failed { name: Option<String>, error: String },
}

/// Pass the interrupt on to the running command's group, without waiting
/// for it to exit
pub fn forward_to_running(supervisor: &Supervisor) -> ForwardReport {
    let running = supervisor.status().map(|h| h.name);

    match supervisor.forward_interrupt() {
        None => {
            info!("No command running, nothing to forward");
            ForwardReport::Idle
        }
        Some(Ok(handle)) => {
            info!(recipe = %handle.name, pgid = handle.pgid, "Interrupt forwarded to running command");
            ForwardReport::Forwarded { name: handle.name }
        }
        Some(Err(e)) => {
            warn!(error = %e, "Failed to forward interrupt, exiting anyway");
            ForwardReport::Failed {
                name: running,
                error: e.to_string(),
            }
        }
    }
}
