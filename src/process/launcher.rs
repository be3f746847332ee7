//! `neard` process launcher.
//!
//! Builds the command line for a subcommand and starts it. Invocations
//! have the shape
//!
//! ```text
//! neard --home <dir> [--verbose] testnet --shards <N> --v <M>
//! neard --home <dir> [--verbose] run [--boot-nodes <key@host:port>]
//! ```
//!
//! `testnet` is waited on. `run` is detached: the child handle is dropped
//! and the process is left to the OS.

use crate::error::{LocalnetError, Result};
use crate::process::table;
use crate::process::types::{ProcessHandle, RunOptions, Spawner, Subcommand};
use log::{debug, info};
use std::fs::OpenOptions;
use std::path::Path;
use std::process::{Command, Stdio};

/// Launches real `neard` processes
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeLauncher;

/// Build the `neard` command for `subcommand` without running it
pub fn build_command(
    binary: &Path,
    working_dir: &Path,
    subcommand: Subcommand,
    options: &RunOptions,
) -> Command {
    let mut command = Command::new(binary);
    command.arg("--home").arg(working_dir);
    if options.verbose {
        command.arg("--verbose");
    }
    command.arg(subcommand.as_str());

    match subcommand {
        Subcommand::Testnet => {
            if let Some(shards) = options.shards {
                command.arg("--shards").arg(shards.to_string());
            }
            if let Some(validators) = options.validators {
                command.arg("--v").arg(validators.to_string());
            }
        }
        Subcommand::Run => {
            if let Some(boot_nodes) = &options.boot_nodes {
                command.arg("--boot-nodes").arg(boot_nodes);
            }
        }
    }

    command.env("RUST_BACKTRACE", "1");
    command
}

fn command_line(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Spawner for NodeLauncher {
    fn spawn(
        &self,
        binary: &Path,
        working_dir: &Path,
        subcommand: Subcommand,
        options: &RunOptions,
    ) -> Result<ProcessHandle> {
        let spawn_error = |reason: String| LocalnetError::Spawn {
            binary: binary.to_path_buf(),
            subcommand: subcommand.as_str(),
            reason,
        };

        if !binary.exists() {
            return Err(spawn_error("binary does not exist".to_string()));
        }

        let mut command = build_command(binary, working_dir, subcommand, options);

        if let Some(output) = &options.output {
            let stdout = OpenOptions::new()
                .create(true)
                .append(true)
                .open(output)
                .map_err(|e| LocalnetError::io(output, e))?;
            let stderr = stdout.try_clone().map_err(|e| LocalnetError::io(output, e))?;
            command.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
        }

        if options.print_command {
            info!("Running: {}", command_line(&command));
        } else {
            debug!("Running: {}", command_line(&command));
        }

        let mut child = command.spawn().map_err(|e| spawn_error(e.to_string()))?;
        let pid = child.id();

        if subcommand.is_blocking() {
            let status = child.wait().map_err(|e| spawn_error(e.to_string()))?;
            if !status.success() {
                return Err(LocalnetError::InitFailed {
                    home: working_dir.to_path_buf(),
                    status: status.to_string(),
                });
            }
        }

        let name = table::process_name(pid).unwrap_or_else(|| {
            binary
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| subcommand.as_str().to_string())
        });

        Ok(ProcessHandle { pid, name })
    }
}
