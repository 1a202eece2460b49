//! HTTP routes

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use makepanel_api::{CommandStatus, MessageBody, VersionInfo};
use makepanel_core::Supervisor;
use makepanel_store::{ConfigStore, StoreError, is_valid_file_name, load_recipes};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::render;
use crate::version::VersionChecker;

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    pub supervisor: Arc<Supervisor>,
    pub store: Arc<dyn ConfigStore>,
    pub static_dir: PathBuf,
    pub makefile: PathBuf,
    pub version: VersionChecker,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/{*path}", get(static_file))
        .route("/editor/update", post(editor_update))
        .route("/files/get", get(files_get))
        .route("/files/save", post(files_save))
        .route("/files/delete", post(files_delete))
        .route("/commands/get", get(commands_get))
        .route("/commands/run", post(commands_run))
        .route("/commands/stop", post(commands_stop))
        .route("/commands/status", get(commands_status))
        .route("/version", get(version))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct FileForm {
    #[serde(default)]
    filename: String,
}

#[derive(Debug, Deserialize)]
struct SaveForm {
    #[serde(default)]
    filename: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct RunForm {
    #[serde(default)]
    command: String,
}

/// Run store or makefile I/O on the blocking pool
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

async fn index() -> ApiResult<Html<String>> {
    Ok(Html(render::base_page()?))
}

async fn static_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<impl IntoResponse> {
    // Every component must be a plain name; no `..`, no hidden files
    if !path.split('/').all(is_valid_file_name) {
        return Err(StoreError::InvalidName(path).into());
    }

    let full = state.static_dir.join(&path);
    let bytes = tokio::fs::read(&full).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound(path.clone()),
        _ => StoreError::Io(e),
    })?;

    let mime = mime_guess::from_path(&full).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes))
}

async fn editor_update(
    State(state): State<AppState>,
    Form(form): Form<FileForm>,
) -> ApiResult<Html<String>> {
    let content = if form.filename.is_empty() {
        String::new()
    } else {
        let store = state.store.clone();
        let name = form.filename.clone();
        blocking(move || store.read(&name)).await?
    };

    Ok(Html(render::editor(&form.filename, &content)?))
}

async fn files_get(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let store = state.store.clone();
    let files = blocking(move || store.list()).await?;
    Ok(Html(render::file_list(&files)?))
}

async fn files_save(
    State(state): State<AppState>,
    Form(form): Form<SaveForm>,
) -> ApiResult<Json<MessageBody>> {
    if form.filename.trim().is_empty() {
        return Err(ApiError::BadRequest("No filename provided".into()));
    }

    let store = state.store.clone();
    let SaveForm { filename, content } = form;
    let saved = blocking(move || store.write(&filename, &content)).await?;
    info!(file = %saved, "File saved");

    Ok(Json(MessageBody::new("File saved successfully")))
}

async fn files_delete(
    State(state): State<AppState>,
    Form(form): Form<FileForm>,
) -> ApiResult<Json<MessageBody>> {
    let store = state.store.clone();
    let name = form.filename.clone();
    blocking(move || store.delete(&name)).await?;
    info!(file = %form.filename, "File deleted");

    Ok(Json(MessageBody::new("File deleted successfully")))
}

async fn scan_makefile(state: &AppState) -> ApiResult<Vec<String>> {
    let makefile = state.makefile.clone();
    blocking(move || load_recipes(&makefile)).await
}

async fn commands_get(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let recipes = scan_makefile(&state).await?;
    debug!(count = recipes.len(), "Recipes scanned");

    let running = state.supervisor.status().map(|h| h.name);
    Ok(Html(render::command_list(&recipes, running.as_deref())?))
}

async fn commands_run(
    State(state): State<AppState>,
    Form(form): Form<RunForm>,
) -> ApiResult<Json<MessageBody>> {
    // Only advertised recipes reach make's argv
    if !form.command.trim().is_empty() {
        let recipes = scan_makefile(&state).await?;
        if !recipes.contains(&form.command) {
            warn!(recipe = %form.command, "Refusing to run unknown recipe");
            return Err(ApiError::BadRequest(format!(
                "Unknown recipe: {}",
                form.command
            )));
        }
    }

    let started = state.supervisor.start(&form.command).await?;
    Ok(Json(MessageBody::new(format!(
        "Command started: {}",
        started.handle.name
    ))))
}

async fn commands_stop(State(state): State<AppState>) -> ApiResult<Json<MessageBody>> {
    let stopped = state.supervisor.stop()?;
    Ok(Json(MessageBody::new(format!(
        "Command stopping: {}",
        stopped.handle.name
    ))))
}

async fn commands_status(State(state): State<AppState>) -> Json<CommandStatus> {
    Json(match state.supervisor.status() {
        Some(handle) => CommandStatus::running(handle.view()),
        None => CommandStatus::idle(),
    })
}

async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(state.version.check().await)
}
