//! Lifecycle management for spawned localnet nodes.
//!
//! Everything here works from the PID registry: the already-running check
//! used before a bootstrap, `status`, and `stop`.

use crate::error::Result;
use crate::process::table;
use crate::registry::{self, ProcessRecord};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Answers "is a localnet already running on this machine?"
pub trait RunningCheck {
    /// Records of the node processes that are currently alive.
    /// Empty means nothing is running.
    fn running(&self) -> Result<Vec<ProcessRecord>>;
}

/// `RunningCheck` over a PID registry file and the OS process table
#[derive(Debug, Clone)]
pub struct ProcessTable {
    pid_file: PathBuf,
}

impl ProcessTable {
    pub fn new(pid_file: impl Into<PathBuf>) -> Self {
        ProcessTable {
            pid_file: pid_file.into(),
        }
    }
}

impl RunningCheck for ProcessTable {
    fn running(&self) -> Result<Vec<ProcessRecord>> {
        Ok(status(&self.pid_file)?
            .into_iter()
            .filter(|node| node.alive)
            .map(|node| node.record)
            .collect())
    }
}

/// A registry record together with its current liveness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub record: ProcessRecord,
    pub alive: bool,
}

/// Report every recorded node and whether it is still running.
///
/// Malformed registry lines are skipped with a warning so a registry left
/// half-written by an interrupted run can still be inspected and stopped.
pub fn status(pid_file: &Path) -> Result<Vec<NodeStatus>> {
    Ok(registry::read_valid(pid_file)?
        .into_iter()
        .map(|record| {
            let alive = table::is_alive(record.pid, &record.process_name);
            NodeStatus { record, alive }
        })
        .collect())
}

/// Terminate every live recorded node and remove the registry.
///
/// Returns the number of processes signalled.
pub fn stop(pid_file: &Path) -> Result<usize> {
    let mut stopped = 0;
    for node in status(pid_file)? {
        let record = &node.record;
        if !node.alive {
            info!("Process {} ({}) is not running", record.pid, record.process_name);
            continue;
        }
        if table::terminate(record.pid) {
            info!(
                "Stopped {} node {} ({})",
                record.network_label, record.pid, record.process_name
            );
            stopped += 1;
        } else {
            warn!("Failed to signal process {} ({})", record.pid, record.process_name);
        }
    }
    registry::remove(pid_file)?;
    Ok(stopped)
}
