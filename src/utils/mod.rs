//! Shared utilities: binary resolution.

pub mod binary;

pub use binary::{find_binary, resolve_binary_path, validate_binary, BinaryError};
