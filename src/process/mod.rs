//! Process launching module.
//!
//! This module starts `neard` processes for the localnet and inspects the
//! OS process table for the ones it started earlier.

pub mod types;
pub mod launcher;
pub mod table;

// Re-export commonly used items for convenience
pub use launcher::NodeLauncher;
pub use types::{ProcessHandle, RunOptions, Spawner, Subcommand};
