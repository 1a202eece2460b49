//! Success and error bodies

use serde::{Deserialize, Serialize};

/// Body of a successful JSON response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a failed JSON response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Error codes for the HTTP surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    NotFound,
    AlreadyRunning,
    NotRunning,
    SpawnFailed,
    SignalFailed,
    StoreError,
    InternalError,
}

impl ErrorCode {
    /// HTTP status code the panel answers with for this error
    pub fn status_code(self) -> u16 {
        match self {
            ErrorCode::InvalidRequest => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::AlreadyRunning | ErrorCode::NotRunning => 409,
            ErrorCode::SpawnFailed
            | ErrorCode::SignalFailed
            | ErrorCode::StoreError
            | ErrorCode::InternalError => 500,
        }
    }
}
