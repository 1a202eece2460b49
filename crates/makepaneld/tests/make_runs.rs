//! Recipes run through the real `make`
//!
//! Each test is skipped when `make` is not installed.

use makepanel_config::VersionCheckConfig;
use makepanel_core::{RunOutcome, Supervisor};
use makepanel_host_linux::{LaunchSpec, LinuxLauncher};
use makepanel_store::DirStore;
use makepaneld::version::VersionChecker;
use makepaneld::{AppState, router};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

const MAKEFILE: &str = "\
build:
\ttouch built
long-task:
\tsleep 60
";

fn make_available() -> bool {
    std::process::Command::new("make")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn make_supervisor(dir: &Path) -> Arc<Supervisor> {
    std::fs::write(dir.join("makefile"), MAKEFILE).unwrap();
    let launcher = LinuxLauncher::new(LaunchSpec {
        program: "make".into(),
        args: vec![],
        working_dir: Some(dir.to_path_buf()),
    });
    Arc::new(Supervisor::new(Arc::new(launcher)))
}

async fn settle(supervisor: &Supervisor) {
    tokio::time::timeout(Duration::from_secs(10), supervisor.wait_idle())
        .await
        .expect("make should exit after the group interrupt");
}

#[tokio::test]
async fn recipe_runs_to_completion() {
    if !make_available() {
        eprintln!("make not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let supervisor = make_supervisor(dir.path());

    let started = supervisor.start("build").await.unwrap();
    let outcome = started.completion.wait().await.unwrap();

    assert!(outcome.is_success());
    assert!(dir.path().join("built").exists());
    assert!(!supervisor.is_running());
}

#[tokio::test]
async fn stop_interrupts_long_task() {
    if !make_available() {
        eprintln!("make not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let supervisor = make_supervisor(dir.path());

    let started = supervisor.start("long-task").await.unwrap();
    assert!(supervisor.is_running());
    assert!(matches!(
        supervisor.start("long-task").await,
        Err(makepanel_core::SupervisorError::AlreadyRunning { .. })
    ));

    supervisor.stop().unwrap();
    settle(&supervisor).await;

    assert!(!supervisor.is_running());
    let outcome = started.completion.wait().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Exited(ref status) if !status.is_success()));

    // The slot is free again
    let again = supervisor.start("build").await.unwrap();
    assert!(again.completion.wait().await.unwrap().is_success());
}

#[tokio::test]
async fn forwarded_interrupt_ends_long_task() {
    if !make_available() {
        eprintln!("make not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let supervisor = make_supervisor(dir.path());

    supervisor.start("long-task").await.unwrap();
    let forwarded = supervisor.forward_interrupt().unwrap().unwrap();
    assert_eq!(forwarded.name, "long-task");

    settle(&supervisor).await;
    assert!(!supervisor.is_running());
}

#[tokio::test]
async fn run_endpoint_never_passes_options_to_make() {
    if !make_available() {
        eprintln!("make not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let supervisor = make_supervisor(dir.path());

    let state = AppState {
        supervisor: supervisor.clone(),
        store: Arc::new(DirStore::new(dir.path().join("configs"), "toml")),
        static_dir: dir.path().join("static"),
        makefile: dir.path().join("makefile"),
        version: VersionChecker::new(VersionCheckConfig::default()),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    let client = reqwest::Client::new();
    let url = format!("http://{}/commands/run", addr);

    let resp = client
        .post(&url)
        .form(&[("command", "--eval=$(shell touch injected)")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(!supervisor.is_running());
    assert!(!dir.path().join("injected").exists());

    let resp = client
        .post(&url)
        .form(&[("command", "build")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    settle(&supervisor).await;
    assert!(dir.path().join("built").exists());
}
