//! Integration tests for makepaneld
//!
//! These tests drive the real router over HTTP, with a mock launcher in
//! place of `make`.

use makepanel_api::{
    CommandStatus, ErrorBody, ErrorCode, MessageBody, VersionCheckState, VersionInfo,
};
use makepanel_config::VersionCheckConfig;
use makepanel_core::Supervisor;
use makepanel_host_api::{ExitStatus, MockLauncher};
use makepanel_store::DirStore;
use makepaneld::version::VersionChecker;
use makepaneld::{AppState, router};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const MAKEFILE: &str = "\
VERSION := 1.0
.PHONY: build long-task
build:
\tcargo build
long-task: build
\tsleep 600
";

struct Panel {
    base: String,
    client: reqwest::Client,
    launcher: Arc<MockLauncher>,
    supervisor: Arc<Supervisor>,
    dir: TempDir,
}

impl Panel {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static/style.css"), "body { margin: 0 }").unwrap();
        std::fs::write(dir.path().join("makefile"), MAKEFILE).unwrap();

        let launcher = Arc::new(MockLauncher::new());
        let supervisor = Arc::new(Supervisor::new(launcher.clone()));

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

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            launcher,
            supervisor,
            dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn status(&self) -> CommandStatus {
        self.get("/commands/status").await.json().await.unwrap()
    }
}

#[tokio::test]
async fn run_conflict_stop_and_rerun() {
    let panel = Panel::start().await;

    let resp = panel.post_form("/commands/run", &[("command", "build")]).await;
    assert_eq!(resp.status(), 200);
    let body: MessageBody = resp.json().await.unwrap();
    assert!(body.message.contains("build"));

    let status = panel.status().await;
    assert!(status.running);
    assert_eq!(status.command.unwrap().name, "build");

    let resp = panel.post_form("/commands/run", &[("command", "build")]).await;
    assert_eq!(resp.status(), 409);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, ErrorCode::AlreadyRunning);

    let resp = panel.post_form("/commands/stop", &[]).await;
    assert_eq!(resp.status(), 200);

    // Stop only requests exit; the slot clears once the process is gone
    assert!(panel.status().await.running);
    panel.launcher.finish_all(ExitStatus::signaled(2));
    tokio::time::timeout(Duration::from_secs(5), panel.supervisor.wait_idle())
        .await
        .unwrap();
    assert!(!panel.status().await.running);

    let resp = panel.post_form("/commands/run", &[("command", "build")]).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(panel.launcher.launched(), vec!["build", "build"]);
}

#[tokio::test]
async fn run_without_command_is_bad_request() {
    let panel = Panel::start().await;

    let resp = panel.post_form("/commands/run", &[("command", "")]).await;
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.error, "No command provided");

    let resp = panel.post_form("/commands/run", &[]).await;
    assert_eq!(resp.status(), 400);

    assert!(panel.launcher.launched().is_empty());
}

#[tokio::test]
async fn only_advertised_recipes_run() {
    let panel = Panel::start().await;

    for name in ["deploy", "--eval=$(shell touch pwned)", "-n", "VERSION", "build extra"] {
        let resp = panel.post_form("/commands/run", &[("command", name)]).await;
        assert_eq!(resp.status(), 400, "{name} should be refused");
        let body: ErrorBody = resp.json().await.unwrap();
        assert_eq!(body.code, ErrorCode::InvalidRequest);
        assert!(body.error.starts_with("Unknown recipe"));
    }

    assert!(panel.launcher.launched().is_empty());
    assert!(!panel.status().await.running);
}

#[tokio::test]
async fn stop_when_idle_is_conflict() {
    let panel = Panel::start().await;

    let resp = panel.post_form("/commands/stop", &[]).await;
    assert_eq!(resp.status(), 409);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, ErrorCode::NotRunning);
    assert_eq!(body.error, "No command is running");
}

#[tokio::test]
async fn spawn_failure_is_server_error() {
    let panel = Panel::start().await;
    panel
        .launcher
        .fail_spawn
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let resp = panel.post_form("/commands/run", &[("command", "build")]).await;
    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, ErrorCode::SpawnFailed);
    assert!(!panel.status().await.running);
}

#[tokio::test]
async fn recipes_are_listed() {
    let panel = Panel::start().await;

    let resp = panel.get("/commands/get").await;
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();

    assert!(html.contains("build"));
    assert!(html.contains("long-task"));
    assert!(!html.contains("VERSION"));
    assert!(!html.contains("PHONY"));
}

#[tokio::test]
async fn missing_makefile_is_server_error() {
    let panel = Panel::start().await;
    std::fs::remove_file(panel.dir.path().join("makefile")).unwrap();

    let resp = panel.get("/commands/get").await;
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn file_lifecycle() {
    let panel = Panel::start().await;

    let resp = panel
        .post_form("/files/save", &[("filename", "app"), ("content", "port = 80")])
        .await;
    assert_eq!(resp.status(), 200);
    assert!(panel.dir.path().join("configs/app.toml").exists());

    let html = panel.get("/files/get").await.text().await.unwrap();
    assert!(html.contains("app.toml"));

    let resp = panel
        .post_form("/editor/update", &[("filename", "app.toml")])
        .await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("port = 80"));

    let resp = panel
        .post_form("/files/delete", &[("filename", "app.toml")])
        .await;
    assert_eq!(resp.status(), 200);
    assert!(!panel.dir.path().join("configs/app.toml").exists());

    let resp = panel
        .post_form("/files/delete", &[("filename", "app.toml")])
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn blank_editor_for_new_file() {
    let panel = Panel::start().await;

    let resp = panel.post_form("/editor/update", &[("filename", "")]).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("<textarea"));
}

#[tokio::test]
async fn file_names_cannot_escape_configs_dir() {
    let panel = Panel::start().await;
    std::fs::write(panel.dir.path().join("secret.toml"), "token = 1").unwrap();

    let resp = panel
        .post_form("/editor/update", &[("filename", "../secret.toml")])
        .await;
    assert_eq!(resp.status(), 400);

    let resp = panel
        .post_form("/files/delete", &[("filename", "../secret.toml")])
        .await;
    assert_eq!(resp.status(), 400);
    assert!(panel.dir.path().join("secret.toml").exists());

    let resp = panel.post_form("/files/save", &[("filename", "")]).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn static_files_are_served() {
    let panel = Panel::start().await;

    let resp = panel.get("/static/style.css").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/css");
    assert_eq!(resp.text().await.unwrap(), "body { margin: 0 }");

    assert_eq!(panel.get("/static/missing.js").await.status(), 404);
    assert_eq!(panel.get("/static/.env").await.status(), 400);
}

#[tokio::test]
async fn index_and_version() {
    let panel = Panel::start().await;

    let resp = panel.get("/").await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("makepanel"));

    let info: VersionInfo = panel.get("/version").await.json().await.unwrap();
    assert_eq!(info.state, VersionCheckState::Disabled);
    assert_eq!(info.current, env!("CARGO_PKG_VERSION"));
}
