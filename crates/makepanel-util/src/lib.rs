//! Shared utilities for makepanel
//!
//! This crate provides:
//! - ID types (RunId)
//! - Default paths for the config file and the files the panel serves

mod ids;
mod paths;

pub use ids::*;
pub use paths::*;
