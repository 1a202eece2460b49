//! makepaneld - the makepanel service
//!
//! This is the main entry point for the panel. It wires together:
//! - Configuration loading
//! - The Linux launcher and the command supervisor
//! - The configuration-file store
//! - The HTTP server
//! - Interrupt forwarding on shutdown

use anyhow::{Context, Result};
use clap::Parser;
use makepanel_config::load_config_or_default;
use makepanel_core::Supervisor;
use makepanel_host_linux::{LaunchSpec, LinuxLauncher};
use makepanel_store::{ConfigStore, DirStore};
use makepanel_util::default_config_path;
use makepaneld::signals::{ShutdownSignals, forward_to_running};
use makepaneld::version::VersionChecker;
use makepaneld::{AppState, router, spawn_event_logger};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// makepaneld - Web control panel for config files and make recipes
#[derive(Parser, Debug)]
#[command(name = "makepaneld")]
#[command(about = "Web control panel for config files and make recipes", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/makepanel/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Listen address override (or set MAKEPANEL_BIND env var)
    #[arg(short, long, env = "MAKEPANEL_BIND")]
    bind: Option<SocketAddr>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "makepaneld starting");

    let config = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    let bind = args.bind.unwrap_or(config.bind);

    let launcher = Arc::new(LinuxLauncher::new(LaunchSpec {
        program: config.runner.program.clone(),
        args: config.runner.args.clone(),
        working_dir: config.runner.working_dir.clone(),
    }));
    let supervisor = Arc::new(Supervisor::new(launcher));
    let _event_logger = spawn_event_logger(&supervisor);

    let store: Arc<dyn ConfigStore> = Arc::new(DirStore::new(
        config.configs_dir.clone(),
        config.config_extension.clone(),
    ));

    let state = AppState {
        supervisor: supervisor.clone(),
        store,
        static_dir: config.static_dir.clone(),
        makefile: config.makefile.clone(),
        version: VersionChecker::new(config.version_check.clone()),
    };

    let mut signals = ShutdownSignals::install()?;

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!(
        addr = %bind,
        makefile = %config.makefile.display(),
        configs_dir = %config.configs_dir.display(),
        "Panel listening"
    );

    let exit_code = tokio::select! {
        result = axum::serve(listener, router(state)).into_future() => {
            match result {
                Ok(()) => error!("HTTP server stopped unexpectedly"),
                Err(e) => error!(error = %e, "HTTP server error"),
            }
            1
        }
        received = signals.recv() => received.exit_code(),
    };

    // Best effort: the child gets the interrupt, the panel does not wait
    forward_to_running(&supervisor);

    info!(exit_code, "makepaneld exiting");
    std::process::exit(exit_code)
}
