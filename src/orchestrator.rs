//! Localnet orchestrator.
//!
//! This module runs the full bootstrap sequence for a local test network:
//!
//! 1. Refuse to start if a localnet is already running
//! 2. Reconcile the home directory (remove it on override, otherwise reuse)
//! 3. Run `neard testnet` if the home does not exist
//! 4. Rewrite every node config with its own listen ports
//! 5. Read node0's public key for the boot peer address
//! 6. Reset the log directory
//! 7. Spawn one detached `neard run` per node, recording each in the PID registry
//!
//! Every step finishes before the next one starts. A failure part-way
//! through is not rolled back: nodes already spawned keep running and stay
//! in the registry so `stop` can still reach them.

use crate::error::{LocalnetError, Result};
use crate::lifecycle::RunningCheck;
use crate::node_config::{self, NodePorts, MAX_NODES};
use crate::process::{RunOptions, Spawner, Subcommand};
use crate::registry::{ProcessRecord, Registry, LOCALNET_LABEL};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Parameters of a localnet run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    /// Validators to generate; ignored when an existing home is reused
    pub num_nodes: u32,
    /// Shards to generate; ignored when an existing home is reused
    pub num_shards: u32,
    /// Remove an existing home before starting
    pub override_home: bool,
    pub verbose: bool,
    /// Log every `neard` command line at info level
    pub print_command: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            num_nodes: 4,
            num_shards: 1,
            override_home: false,
            verbose: true,
            print_command: false,
        }
    }
}

impl RunParams {
    pub fn validate(&self) -> Result<()> {
        if self.num_nodes == 0 {
            return Err(LocalnetError::InvalidParams("num_nodes must be at least 1".to_string()));
        }
        if self.num_nodes as usize > MAX_NODES {
            return Err(LocalnetError::InvalidParams(format!(
                "num_nodes must be at most {}",
                MAX_NODES
            )));
        }
        if self.num_shards == 0 {
            return Err(LocalnetError::InvalidParams("num_shards must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Outcome of a successful bootstrap
#[derive(Debug, Clone)]
pub struct LocalnetSummary {
    pub home: PathBuf,
    pub num_nodes: usize,
    pub logs_dir: PathBuf,
    pub records: Vec<ProcessRecord>,
    pub status_url: String,
}

/// Boot peer address every non-first node is started with.
///
/// All nodes bootstrap from node0 (star topology), at node0's rewritten
/// network port.
pub fn boot_peer(public_key: &str) -> String {
    format!("{}@127.0.0.1:{}", public_key, NodePorts::SEED.network)
}

/// Remove and recreate a directory; a missing directory is fine
fn reset_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(LocalnetError::io(dir, e)),
    }
    fs::create_dir_all(dir).map_err(|e| LocalnetError::io(dir, e))
}

/// Drives the bootstrap sequence against injected collaborators
pub struct Bootstrapper<'a> {
    binary: PathBuf,
    logs_dir: PathBuf,
    pid_file: PathBuf,
    spawner: &'a dyn Spawner,
    running: &'a dyn RunningCheck,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(
        binary: impl Into<PathBuf>,
        logs_dir: impl Into<PathBuf>,
        pid_file: impl Into<PathBuf>,
        spawner: &'a dyn Spawner,
        running: &'a dyn RunningCheck,
    ) -> Self {
        Bootstrapper {
            binary: binary.into(),
            logs_dir: logs_dir.into(),
            pid_file: pid_file.into(),
            spawner,
            running,
        }
    }

    /// Bootstrap a localnet in `home` and leave its nodes running
    pub fn bootstrap(&self, home: &Path, params: &RunParams) -> Result<LocalnetSummary> {
        let live = self.running.running()?;
        if !live.is_empty() {
            return Err(LocalnetError::AlreadyRunning { count: live.len() });
        }
        params.validate()?;

        self.reconcile_home(home, params)?;

        let num_nodes = node_config::rewrite_workspace(home)?;
        if num_nodes == 0 {
            return Err(LocalnetError::MissingWorkspace {
                path: node_config::node_dir(home, 0).join(node_config::CONFIG_FILE),
            });
        }
        info!("Configured {} node(s) in {:?}", num_nodes, home);

        let public_key = node_config::bootstrap_public_key(home)?;
        debug!("Bootstrap public key: {}", public_key);

        reset_dir(&self.logs_dir)?;

        let records = self.spawn_nodes(home, num_nodes, &public_key, params)?;

        let status_url = format!("http://127.0.0.1:{}/status", NodePorts::SEED.rpc);
        info!("Localnet was spawned successfully...");
        info!("Localnet logs written in: {:?}", self.logs_dir);
        info!("Check localnet status at {}", status_url);

        Ok(LocalnetSummary {
            home: home.to_path_buf(),
            num_nodes,
            logs_dir: self.logs_dir.clone(),
            records,
            status_url,
        })
    }

    fn reconcile_home(&self, home: &Path, params: &RunParams) -> Result<()> {
        if home.exists() {
            if !params.override_home {
                info!("Reusing existing localnet home {:?}", home);
                return Ok(());
            }
            info!("Removing old data in {:?}", home);
            fs::remove_dir_all(home).map_err(|e| LocalnetError::io(home, e))?;
        }

        info!(
            "Initializing localnet with {} validator(s) and {} shard(s)",
            params.num_nodes, params.num_shards
        );
        let options = RunOptions {
            shards: Some(params.num_shards),
            validators: Some(params.num_nodes),
            print_command: params.print_command,
            ..Default::default()
        };
        self.spawner.spawn(&self.binary, home, Subcommand::Testnet, &options)?;
        Ok(())
    }

    fn spawn_nodes(
        &self,
        home: &Path,
        num_nodes: usize,
        public_key: &str,
        params: &RunParams,
    ) -> Result<Vec<ProcessRecord>> {
        let mut registry = Registry::create(&self.pid_file)?;
        let mut records = Vec::with_capacity(num_nodes);

        for i in 0..num_nodes {
            let options = RunOptions {
                boot_nodes: (i > 0).then(|| boot_peer(public_key)),
                output: Some(self.logs_dir.join(format!("node{}.log", i))),
                verbose: params.verbose,
                print_command: params.print_command,
                ..Default::default()
            };
            let handle = self
                .spawner
                .spawn(&self.binary, &node_config::node_dir(home, i), Subcommand::Run, &options)?;
            debug!("Spawned node{} with pid {} ({})", i, handle.pid, handle.name);

            let record = ProcessRecord::new(handle.pid, handle.name, LOCALNET_LABEL);
            registry.append(&record)?;
            records.push(record);
        }

        Ok(records)
    }
}
