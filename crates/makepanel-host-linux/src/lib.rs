//! Linux launcher for makepanel
//!
//! Provides:
//! - Recipe spawning with process group isolation
//! - Interrupt (SIGINT) delivery to the whole process group
//! - Exit observation through tokio's child reaper

mod launcher;
mod process;

pub use launcher::*;
pub use process::*;
