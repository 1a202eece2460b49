//! makepaneld - the makepanel web service
//!
//! Wires the file store, the recipe scanner and the single-flight command
//! supervisor behind an axum router, and handles the panel's own signals.

pub mod error;
pub mod render;
pub mod routes;
pub mod signals;
pub mod version;

pub use routes::{AppState, router};

use makepanel_core::{RunOutcome, Supervisor, SupervisorEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Log supervisor events until the supervisor is dropped
pub fn spawn_event_logger(supervisor: &Supervisor) -> JoinHandle<()> {
    let mut events = supervisor.subscribe();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SupervisorEvent::Started { run_id, name, pid }) => {
                    debug!(run_id = %run_id, recipe = %name, pid, "Event: started");
                }
                Ok(SupervisorEvent::StopRequested { run_id, name }) => {
                    debug!(run_id = %run_id, recipe = %name, "Event: stop requested");
                }
                Ok(SupervisorEvent::Finished {
                    run_id,
                    name,
                    outcome,
                    duration,
                }) => match outcome {
                    RunOutcome::Exited(status) => info!(
                        run_id = %run_id,
                        recipe = %name,
                        status = %status,
                        duration_ms = duration.as_millis() as u64,
                        "Run finished"
                    ),
                    RunOutcome::WaitFailed(error) => warn!(
                        run_id = %run_id,
                        recipe = %name,
                        error = %error,
                        "Run finished without an exit status"
                    ),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event logger lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
