//! Node configuration rewriting.
//!
//! `neard testnet` generates every node with the same default listen
//! addresses. Before the nodes can share one machine, each `config.json` is
//! rewritten so that node `i` listens on its own RPC and P2P ports:
//!
//! ```text
//! node0: rpc 0.0.0.0:3031  network 0.0.0.0:24568
//! node1: rpc 0.0.0.0:3032  network 0.0.0.0:24569
//! ...
//! ```
//!
//! Every other key of the document is left untouched.

use crate::error::{LocalnetError, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Base RPC port; node ordinal `k` listens on `RPC_BASE_PORT + k`
pub const RPC_BASE_PORT: u16 = 3030;

/// Base P2P port; node ordinal `k` listens on `NETWORK_BASE_PORT + k`
pub const NETWORK_BASE_PORT: u16 = 24567;

pub const CONFIG_FILE: &str = "config.json";
pub const NODE_KEY_FILE: &str = "node_key.json";

/// Largest node count whose network port still fits in a `u16`
pub const MAX_NODES: usize = (u16::MAX - NETWORK_BASE_PORT) as usize;

/// Listen ports assigned to one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePorts {
    pub rpc: u16,
    pub network: u16,
}

impl NodePorts {
    /// Ports of node0, the boot peer of every other node
    pub const SEED: NodePorts = NodePorts {
        rpc: RPC_BASE_PORT + 1,
        network: NETWORK_BASE_PORT + 1,
    };

    /// Ports for the 1-based node ordinal `k`, or `None` if either port
    /// would fall outside the `u16` range
    pub fn for_ordinal(k: usize) -> Option<Self> {
        let k = u16::try_from(k).ok()?;
        Some(NodePorts {
            rpc: RPC_BASE_PORT.checked_add(k)?,
            network: NETWORK_BASE_PORT.checked_add(k)?,
        })
    }

    /// Ports for the node stored in `node{index}`
    pub fn for_index(index: usize) -> Option<Self> {
        Self::for_ordinal(index.checked_add(1)?)
    }

    pub fn rpc_addr(&self) -> String {
        format!("0.0.0.0:{}", self.rpc)
    }

    pub fn network_addr(&self) -> String {
        format!("0.0.0.0:{}", self.network)
    }
}

/// Directory of node `index` inside a localnet home
pub fn node_dir(home: &Path, index: usize) -> PathBuf {
    home.join(format!("node{}", index))
}

/// Replace `rpc.addr` and `network.addr` in a node config.
///
/// Fails if either section is missing or is not a JSON object. The returned
/// document is otherwise identical to the input.
pub fn rewrite_addrs(mut config: Value, ordinal: usize) -> Result<Value, String> {
    let ports = NodePorts::for_ordinal(ordinal)
        .ok_or_else(|| format!("node ordinal {} exceeds the port range", ordinal))?;
    set_addr(&mut config, "rpc", ports.rpc_addr())?;
    set_addr(&mut config, "network", ports.network_addr())?;
    Ok(config)
}

fn set_addr(config: &mut Value, section: &str, addr: String) -> Result<(), String> {
    let section_obj = config
        .get_mut(section)
        .ok_or_else(|| format!("missing \"{}\" section", section))?
        .as_object_mut()
        .ok_or_else(|| format!("\"{}\" is not an object", section))?;
    section_obj.insert("addr".to_string(), Value::String(addr));
    Ok(())
}

/// Read and parse a JSON file, mapping failures to `MalformedConfig`
pub fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| LocalnetError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| LocalnetError::malformed(path, e.to_string()))
}

/// Rewrite one node's `config.json` in place for the given 1-based ordinal
pub fn rewrite_config_file(path: &Path, ordinal: usize) -> Result<()> {
    let config = read_json(path)?;
    let rewritten =
        rewrite_addrs(config, ordinal).map_err(|reason| LocalnetError::malformed(path, reason))?;
    let pretty = serde_json::to_string_pretty(&rewritten)
        .map_err(|e| LocalnetError::malformed(path, e.to_string()))?;
    fs::write(path, pretty).map_err(|e| LocalnetError::io(path, e))?;
    Ok(())
}

/// Rewrite the configs of `node0`, `node1`, ... until the first index whose
/// `config.json` does not exist. Returns the number of nodes rewritten.
pub fn rewrite_workspace(home: &Path) -> Result<usize> {
    let mut count = 0;
    loop {
        let path = node_dir(home, count).join(CONFIG_FILE);
        if !path.exists() {
            break;
        }
        count += 1;
        rewrite_config_file(&path, count)?;
        debug!("Rewrote {:?} for node ordinal {}", path, count);
    }
    Ok(count)
}

/// Extract `public_key` from `node0/node_key.json`
pub fn bootstrap_public_key(home: &Path) -> Result<String> {
    let node0 = node_dir(home, 0);
    let key_path = node0.join(NODE_KEY_FILE);
    if !key_path.exists() {
        let missing = if node0.exists() { key_path } else { node0 };
        return Err(LocalnetError::MissingWorkspace { path: missing });
    }

    let data = read_json(&key_path)?;
    data.get("public_key")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LocalnetError::malformed(&key_path, "missing string field \"public_key\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_config() -> Value {
        json!({
            "genesis_file": "genesis.json",
            "rpc": { "addr": "0.0.0.0:3030", "cors_allowed_origins": ["*"] },
            "network": { "addr": "0.0.0.0:24567", "boot_nodes": "", "max_peers": 40 },
            "consensus": { "min_num_peers": 3 }
        })
    }

    #[test]
    fn test_ports_for_index() {
        assert_eq!(NodePorts::for_index(0), Some(NodePorts { rpc: 3031, network: 24568 }));
        assert_eq!(NodePorts::for_index(0), Some(NodePorts::SEED));
        assert_eq!(NodePorts::for_index(3), Some(NodePorts { rpc: 3034, network: 24571 }));
    }

    #[test]
    fn test_ports_out_of_range() {
        let last = NodePorts::for_ordinal(MAX_NODES).unwrap();
        assert_eq!(last.network, u16::MAX);
        assert!(NodePorts::for_ordinal(MAX_NODES + 1).is_none());
        // Would wrap around to node0's ports if truncated to u16
        assert!(NodePorts::for_ordinal(65_537).is_none());
        assert!(NodePorts::for_index(usize::MAX).is_none());
    }

    #[test]
    fn test_rewrite_addrs_rejects_ordinal_past_port_range() {
        let err = rewrite_addrs(sample_config(), 41_000).unwrap_err();
        assert!(err.contains("exceeds the port range"));
        assert!(rewrite_addrs(sample_config(), 65_537).is_err());
    }

    #[test]
    fn test_rewrite_addrs_preserves_other_keys() {
        let original = sample_config();
        let rewritten = rewrite_addrs(original.clone(), 2).unwrap();

        assert_eq!(rewritten["rpc"]["addr"], "0.0.0.0:3032");
        assert_eq!(rewritten["network"]["addr"], "0.0.0.0:24569");
        assert_eq!(
            rewritten["rpc"]["cors_allowed_origins"],
            original["rpc"]["cors_allowed_origins"]
        );
        assert_eq!(rewritten["network"]["max_peers"], 40);
        assert_eq!(rewritten["genesis_file"], original["genesis_file"]);
        assert_eq!(rewritten["consensus"], original["consensus"]);
    }

    #[test]
    fn test_rewrite_addrs_is_idempotent_per_ordinal() {
        let once = rewrite_addrs(sample_config(), 1).unwrap();
        let twice = rewrite_addrs(once.clone(), 1).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_addrs_distinct_across_nodes() {
        let mut seen = std::collections::HashSet::new();
        for k in 1..=16 {
            let cfg = rewrite_addrs(sample_config(), k).unwrap();
            assert!(seen.insert(cfg["rpc"]["addr"].to_string()));
            assert!(seen.insert(cfg["network"]["addr"].to_string()));
        }
    }

    #[test]
    fn test_rewrite_addrs_missing_section() {
        let err = rewrite_addrs(json!({ "rpc": { "addr": "x" } }), 1).unwrap_err();
        assert!(err.contains("network"));

        let err = rewrite_addrs(json!({ "rpc": "0.0.0.0:3030", "network": {} }), 1).unwrap_err();
        assert!(err.contains("not an object"));
    }

    #[test]
    fn test_rewrite_workspace_stops_at_first_gap() {
        let home = TempDir::new().unwrap();
        for i in [0usize, 1, 3] {
            let dir = node_dir(home.path(), i);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(CONFIG_FILE), sample_config().to_string()).unwrap();
        }

        assert_eq!(rewrite_workspace(home.path()).unwrap(), 2);

        let node1 = read_json(&node_dir(home.path(), 1).join(CONFIG_FILE)).unwrap();
        assert_eq!(node1["rpc"]["addr"], "0.0.0.0:3032");
        let node3 = read_json(&node_dir(home.path(), 3).join(CONFIG_FILE)).unwrap();
        assert_eq!(node3["rpc"]["addr"], "0.0.0.0:3030");
    }

    #[test]
    fn test_rewrite_config_file_rejects_bad_json() {
        let home = TempDir::new().unwrap();
        let path = home.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            rewrite_config_file(&path, 1),
            Err(LocalnetError::MalformedConfig { .. })
        ));
    }

    #[test]
    fn test_bootstrap_public_key() {
        let home = TempDir::new().unwrap();
        assert!(matches!(
            bootstrap_public_key(home.path()),
            Err(LocalnetError::MissingWorkspace { .. })
        ));

        let node0 = node_dir(home.path(), 0);
        fs::create_dir_all(&node0).unwrap();
        fs::write(node0.join(NODE_KEY_FILE), r#"{"account_id": "", "secret_key": "s"}"#).unwrap();
        assert!(matches!(
            bootstrap_public_key(home.path()),
            Err(LocalnetError::MalformedConfig { .. })
        ));

        fs::write(
            node0.join(NODE_KEY_FILE),
            r#"{"account_id": "", "public_key": "ed25519:abc"}"#,
        )
        .unwrap();
        assert_eq!(bootstrap_public_key(home.path()).unwrap(), "ed25519:abc");
    }
}
