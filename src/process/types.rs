//! Process type definitions.
//!
//! Types shared by the launcher and its callers: which `neard` subcommand
//! to run, the options that shape its invocation, and the handle returned
//! for a spawned process.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// `neard` subcommands used by the localnet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    /// Generate a multi-node testnet home (blocking)
    Testnet,
    /// Run a single node (detached)
    Run,
}

impl Subcommand {
    /// Get the string representation of the subcommand
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Testnet => "testnet",
            Subcommand::Run => "run",
        }
    }

    /// Whether the launcher waits for the process to exit
    pub fn is_blocking(&self) -> bool {
        matches!(self, Subcommand::Testnet)
    }
}

/// Options for a single `neard` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Number of shards (`testnet` only)
    pub shards: Option<u32>,
    /// Number of validators (`testnet` only)
    pub validators: Option<u32>,
    /// Boot peer address (`run` only)
    pub boot_nodes: Option<String>,
    /// File receiving stdout and stderr
    pub output: Option<PathBuf>,
    pub verbose: bool,
    /// Log the full command line before running it
    pub print_command: bool,
}

/// A spawned (or, for blocking subcommands, completed) process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
    pub name: String,
}

/// Something that can start `neard` processes.
///
/// The bootstrapper only talks to the binary through this trait so the
/// orchestration can be exercised without a real node.
pub trait Spawner {
    fn spawn(
        &self,
        binary: &Path,
        working_dir: &Path,
        subcommand: Subcommand,
        options: &RunOptions,
    ) -> Result<ProcessHandle>;
}
