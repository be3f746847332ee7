//! Error types shared by the localnet orchestration modules.

use std::path::PathBuf;

/// Errors that can occur while bootstrapping or managing a localnet
#[derive(Debug, thiserror::Error)]
pub enum LocalnetError {
    #[error("A localnet is already running ({count} live process(es)); stop it first")]
    AlreadyRunning { count: usize },

    #[error("Malformed JSON in {path}: {reason}")]
    MalformedConfig { path: PathBuf, reason: String },

    #[error("Failed to spawn {binary} {subcommand}: {reason}")]
    Spawn {
        binary: PathBuf,
        subcommand: &'static str,
        reason: String,
    },

    #[error("Node workspace missing: {path} does not exist")]
    MissingWorkspace { path: PathBuf },

    #[error("Initialization of {home} exited unsuccessfully ({status})")]
    InitFailed { home: PathBuf, status: String },

    #[error("Invalid run parameters: {0}")]
    InvalidParams(String),

    #[error("Malformed PID registry line {line} in {path}: {content:?}")]
    MalformedRegistry {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LocalnetError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LocalnetError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LocalnetError::MalformedConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = LocalnetError> = std::result::Result<T, E>;
