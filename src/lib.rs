//! # nearup-localnet - Bootstrap a multi-node local NEAR test network
//!
//! This library provisions and launches a localnet: several `neard` nodes on
//! one machine, talking to each other over localhost on top of a locally
//! generated genesis.
//!
//! ## Overview
//!
//! A run goes through a fixed sequence:
//!
//! - the home directory is removed (`override`) or reused
//! - `neard testnet` generates `node0..nodeN` if the home is new
//! - each `node{i}/config.json` gets its own RPC and P2P ports
//! - node0's public key becomes the boot peer of every other node
//! - one detached `neard run` per node is started, logging to `node{i}.log`
//! - each process is recorded in the PID registry
//!
//! ## Architecture
//!
//! - `orchestrator`: the bootstrap sequence
//! - `node_config`: per-node config rewriting and key extraction
//! - `process`: `neard` launcher and process table queries
//! - `registry`: PID registry file
//! - `lifecycle`: running check, status, stop
//! - `settings`: well-known paths and their YAML overrides
//! - `utils`: binary resolution
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nearup_localnet::lifecycle::ProcessTable;
//! use nearup_localnet::orchestrator::{Bootstrapper, RunParams};
//! use nearup_localnet::process::NodeLauncher;
//! use nearup_localnet::settings::load_settings;
//! use nearup_localnet::utils::find_binary;
//!
//! let settings = load_settings(None)?;
//! let binary = find_binary(None, &settings)?;
//! let running = ProcessTable::new(&settings.pid_file);
//!
//! let bootstrapper = Bootstrapper::new(
//!     binary,
//!     &settings.logs_dir,
//!     &settings.pid_file,
//!     &NodeLauncher,
//!     &running,
//! );
//! let summary = bootstrapper.bootstrap(&settings.default_home, &RunParams::default())?;
//! println!("{} nodes running, status at {}", summary.num_nodes, summary.status_url);
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Port Layout
//!
//! Node `i` listens for RPC on `0.0.0.0:{3031 + i}` and for P2P on
//! `0.0.0.0:{24568 + i}`.
//!
//! ## Error Handling
//!
//! Library operations return [`error::LocalnetError`]. The command-line
//! binary reports them through `color_eyre`.

pub mod error;
pub mod lifecycle;
pub mod node_config;
pub mod orchestrator;
pub mod process;
pub mod registry;
pub mod settings;
pub mod utils;
