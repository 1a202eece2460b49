//! Payload types for the makepanel HTTP surface
//!
//! This crate defines what the panel's JSON endpoints send back:
//! - Success and error bodies
//! - The running-command status
//! - Version check results

mod responses;
mod types;

pub use responses::*;
pub use types::*;
