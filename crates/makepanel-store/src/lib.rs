//! File layer for makepanel
//!
//! Provides:
//! - A store of editable configuration files kept in one directory
//! - The makefile recipe scanner

mod dir;
mod recipes;
mod traits;

pub use dir::*;
pub use recipes::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid file name '{0}'")]
    InvalidName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
