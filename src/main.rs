use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;

use nearup_localnet::lifecycle::{self, ProcessTable};
use nearup_localnet::orchestrator::{Bootstrapper, RunParams};
use nearup_localnet::process::NodeLauncher;
use nearup_localnet::settings::load_settings;
use nearup_localnet::utils::find_binary;

/// Bootstrap and manage a local multi-node NEAR test network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML file overriding the default localnet paths
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a localnet
    Localnet {
        /// Directory containing a `neard` binary (defaults to the cached one)
        #[arg(long)]
        binary_path: Option<PathBuf>,

        /// Localnet home directory
        #[arg(long)]
        home: Option<PathBuf>,

        /// Number of validator nodes to initialize
        #[arg(long, default_value_t = 4)]
        num_nodes: u32,

        /// Number of shards to initialize
        #[arg(long, default_value_t = 1)]
        num_shards: u32,

        /// Remove data from a previous localnet run
        #[arg(long = "override")]
        override_home: bool,

        /// Run nodes without --verbose
        #[arg(long)]
        quiet: bool,

        /// Print each neard command before running it
        #[arg(long)]
        print_commands: bool,
    },
    /// Show the recorded localnet processes
    Status,
    /// Stop the running localnet
    Stop,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings(args.config.as_deref())?;

    match args.command {
        Command::Localnet {
            binary_path,
            home,
            num_nodes,
            num_shards,
            override_home,
            quiet,
            print_commands,
        } => {
            let binary = find_binary(binary_path.as_deref(), &settings)
                .wrap_err("Cannot start localnet without a neard binary")?;
            let home = home.unwrap_or_else(|| settings.default_home.clone());
            info!("Using neard binary: {:?}", binary);
            info!("Localnet home: {:?}", home);

            let params = RunParams {
                num_nodes,
                num_shards,
                override_home,
                verbose: !quiet,
                print_command: print_commands,
            };
            let running = ProcessTable::new(&settings.pid_file);
            let bootstrapper = Bootstrapper::new(
                binary,
                &settings.logs_dir,
                &settings.pid_file,
                &NodeLauncher,
                &running,
            );
            bootstrapper
                .bootstrap(&home, &params)
                .wrap_err_with(|| format!("Failed to start localnet in '{}'", home.display()))?;
        }
        Command::Status => {
            let nodes = lifecycle::status(&settings.pid_file)?;
            if nodes.is_empty() {
                info!("No localnet processes recorded in {:?}", settings.pid_file);
            }
            for node in nodes {
                let record = &node.record;
                let state = if node.alive { "running" } else { "not running" };
                info!(
                    "{} {} ({}): {}",
                    record.network_label, record.pid, record.process_name, state
                );
            }
        }
        Command::Stop => {
            let stopped = lifecycle::stop(&settings.pid_file)?;
            if stopped == 0 {
                warn!("No running localnet processes found");
            } else {
                info!("Stopped {} localnet process(es)", stopped);
            }
        }
    }

    Ok(())
}
