//! Single-flight command supervisor for makepanel
//!
//! This crate is the heart of makepanel, containing:
//! - The command slot (zero or one running recipe, behind a guard)
//! - The supervisor state machine (Idle -> Running -> Idle)
//! - Stop and interrupt forwarding to the running recipe's process group

mod events;
mod slot;
mod supervisor;

pub use events::*;
pub use slot::*;
pub use supervisor::*;
