//! Handler errors and their HTTP rendering

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use makepanel_api::{ErrorBody, ErrorCode};
use makepanel_core::SupervisorError;
use makepanel_store::StoreError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::BadRequest(_) => ErrorCode::InvalidRequest,
            ApiError::Supervisor(e) => match e {
                SupervisorError::EmptyName => ErrorCode::InvalidRequest,
                SupervisorError::AlreadyRunning { .. } => ErrorCode::AlreadyRunning,
                SupervisorError::NotRunning => ErrorCode::NotRunning,
                SupervisorError::Spawn(_) => ErrorCode::SpawnFailed,
                SupervisorError::Signal(_) => ErrorCode::SignalFailed,
            },
            ApiError::Store(e) => match e {
                StoreError::InvalidName(_) => ErrorCode::InvalidRequest,
                StoreError::NotFound(_) => ErrorCode::NotFound,
                StoreError::Io(_) => ErrorCode::StoreError,
            },
            ApiError::Render(_) | ApiError::Task(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status =
            StatusCode::from_u16(code.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = ?code, error = %self, "Request failed");
        }

        (status, Json(ErrorBody::new(code, self.to_string()))).into_response()
    }
}
