//! # PID Registry
//!
//! Durable record of the node processes spawned by a localnet run. Spawned
//! nodes are detached from the launcher, so this file is the only handle
//! later tooling (`status`, `stop`, the already-running check) has on them.
//!
//! ## File Format
//!
//! One record per line, fields separated by `|`:
//!
//! ```text
//! 41237|neard|localnet
//! 41241|neard|localnet
//! ```
//!
//! The file is truncated at the start of every spawn loop and written
//! sequentially. There is no locking; a single writer is assumed.

use crate::error::{LocalnetError, Result};
use log::warn;
use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Network label written for every localnet node
pub const LOCALNET_LABEL: &str = "localnet";

/// One spawned node process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub process_name: String,
    pub network_label: String,
}

impl ProcessRecord {
    pub fn new(
        pid: u32,
        process_name: impl Into<String>,
        network_label: impl Into<String>,
    ) -> Self {
        ProcessRecord {
            pid,
            process_name: process_name.into(),
            network_label: network_label.into(),
        }
    }

    /// Parse a `pid|name|label` line
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.trim().splitn(3, '|');
        let pid = fields.next()?.parse().ok()?;
        let process_name = fields.next()?;
        let network_label = fields.next()?;
        if process_name.is_empty() {
            return None;
        }
        Some(ProcessRecord::new(pid, process_name, network_label))
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.pid, self.process_name, self.network_label)
    }
}

/// Open registry file being written by a spawn loop
#[derive(Debug)]
pub struct Registry {
    path: PathBuf,
    file: File,
}

impl Registry {
    /// Create the registry file, truncating any previous content
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LocalnetError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| LocalnetError::io(path, e))?;
        Ok(Registry {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Append one record and flush it so it survives a later failure
    pub fn append(&mut self, record: &ProcessRecord) -> Result<()> {
        writeln!(self.file, "{}", record)
            .and_then(|_| self.file.flush())
            .map_err(|e| LocalnetError::io(&self.path, e))
    }
}

/// Overwrite `path` with exactly `records`, in order
pub fn record_all(path: &Path, records: &[ProcessRecord]) -> Result<()> {
    let mut registry = Registry::create(path)?;
    for record in records {
        registry.append(record)?;
    }
    Ok(())
}

/// Parse every non-blank line of `path`, one result per line.
/// A missing file yields no lines.
fn parse_lines(path: &Path) -> Result<Vec<Result<ProcessRecord>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LocalnetError::io(path, e)),
    };

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            ProcessRecord::parse_line(line).ok_or_else(|| LocalnetError::MalformedRegistry {
                path: path.to_path_buf(),
                line: idx + 1,
                content: line.to_string(),
            })
        })
        .collect())
}

/// Read every record from `path`, failing on the first malformed line.
/// A missing file yields an empty list.
pub fn read_all(path: &Path) -> Result<Vec<ProcessRecord>> {
    parse_lines(path)?.into_iter().collect()
}

/// Read the well-formed records from `path`, skipping malformed lines.
///
/// A run interrupted mid-write can leave a truncated last line; the
/// records before it still name live processes.
pub fn read_valid(path: &Path) -> Result<Vec<ProcessRecord>> {
    Ok(parse_lines(path)?
        .into_iter()
        .filter_map(|parsed| match parsed {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping registry entry: {}", e);
                None
            }
        })
        .collect())
}

/// Delete the registry file; absence is not an error
pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LocalnetError::io(path, e)),
    }
}
