//! `neard` binary resolution and validation utilities.
//!
//! The binary is looked up in a user-supplied directory, or in the localnet
//! folder where a previously fetched binary is cached. Fetching itself is
//! not done here.

use crate::settings::{Settings, NEARD_BINARY};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Errors that can occur during binary resolution or validation
#[derive(Debug, thiserror::Error)]
pub enum BinaryError {
    #[error("Binary not found: {path}")]
    NotFound { path: String },

    #[error("Binary is not executable: {path}")]
    NotExecutable { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },
}

/// Resolve the `neard` path.
///
/// Resolution rules:
/// 1. `binary_dir` given: `{binary_dir}/neard`
/// 2. Otherwise: `{localnet_dir}/neard`
pub fn resolve_binary_path(binary_dir: Option<&Path>, settings: &Settings) -> PathBuf {
    binary_dir
        .unwrap_or(&settings.localnet_dir)
        .join(NEARD_BINARY)
}

/// Validate that a binary exists and is executable.
///
/// Called before the bootstrap so a bad path fails before any workspace is
/// touched.
pub fn validate_binary(path: &Path) -> Result<(), BinaryError> {
    if !path.exists() {
        return Err(BinaryError::NotFound {
            path: path.display().to_string(),
        });
    }

    let metadata = path.metadata().map_err(|_| BinaryError::InvalidPath {
        path: path.display().to_string(),
    })?;

    if !metadata.is_file() {
        return Err(BinaryError::InvalidPath {
            path: path.display().to_string(),
        });
    }

    // Any execute bit set
    #[cfg(unix)]
    if metadata.permissions().mode() & 0o111 == 0 {
        return Err(BinaryError::NotExecutable {
            path: path.display().to_string(),
        });
    }

    Ok(())
}

/// Resolve and validate in one step
pub fn find_binary(binary_dir: Option<&Path>, settings: &Settings) -> Result<PathBuf, BinaryError> {
    let resolved = resolve_binary_path(binary_dir, settings);
    validate_binary(&resolved)?;
    Ok(resolved)
}
