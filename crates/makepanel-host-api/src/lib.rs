//! Process launcher interfaces for makepanel
//!
//! This crate defines the capability-based interface between the command
//! supervisor and platform-specific process handling. It contains no platform
//! code itself: a launcher starts a recipe in its own process group and can
//! interrupt that group, nothing more.

mod handle;
mod mock;
mod traits;

pub use handle::*;
pub use mock::*;
pub use traits::*;
