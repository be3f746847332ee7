//! Well-known localnet paths and the optional YAML file that overrides them.
//!
//! ```yaml
//! # every key is optional
//! localnet_dir: /opt/nearup/localnet
//! logs_dir: /var/log/nearup
//! pid_file: /run/nearup/node.pid
//! default_home: /data/near/localnet
//! ```

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Name of the node executable inside the binary directory
pub const NEARD_BINARY: &str = "neard";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot determine home directory")]
    NoHomeDir,
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Resolved localnet paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the cached `neard` binary
    pub localnet_dir: PathBuf,
    /// Directory receiving one log file per node
    pub logs_dir: PathBuf,
    /// PID registry file
    pub pid_file: PathBuf,
    /// Localnet home used when `--home` is not given
    pub default_home: PathBuf,
}

/// On-disk overrides; any missing key keeps its default
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub localnet_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    pub pid_file: Option<PathBuf>,
    pub default_home: Option<PathBuf>,
}

impl Settings {
    /// Defaults rooted at a user home directory
    pub fn from_user_home(user_home: &Path) -> Self {
        let nearup = user_home.join(".nearup");
        Settings {
            localnet_dir: nearup.join("localnet"),
            logs_dir: nearup.join("localnet-logs"),
            pid_file: nearup.join("node.pid"),
            default_home: user_home.join(".near").join("localnet"),
        }
    }

    /// Defaults rooted at `$HOME`
    pub fn defaults() -> Result<Self, SettingsError> {
        let home = env::var("HOME").map_err(|_| SettingsError::NoHomeDir)?;
        Ok(Self::from_user_home(Path::new(&home)))
    }

    /// Apply file overrides on top of these settings
    pub fn merge(mut self, overrides: SettingsFile) -> Self {
        if let Some(dir) = overrides.localnet_dir {
            self.localnet_dir = dir;
        }
        if let Some(dir) = overrides.logs_dir {
            self.logs_dir = dir;
        }
        if let Some(file) = overrides.pid_file {
            self.pid_file = file;
        }
        if let Some(home) = overrides.default_home {
            self.default_home = home;
        }
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields: [(&'static str, &Path); 4] = [
            ("localnet_dir", &self.localnet_dir),
            ("logs_dir", &self.logs_dir),
            ("pid_file", &self.pid_file),
            ("default_home", &self.default_home),
        ];
        for (field, path) in fields {
            if path.as_os_str().is_empty() {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "path cannot be empty".to_string(),
                });
            }
        }
        if self.pid_file.is_dir() {
            return Err(SettingsError::Invalid {
                field: "pid_file",
                reason: format!("{} is a directory", self.pid_file.display()),
            });
        }
        Ok(())
    }
}

/// Load settings: `$HOME` defaults, overridden by `config_path` if given
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let defaults = Settings::defaults()?;
    let settings = match config_path {
        Some(path) => {
            info!("Loading settings from: {:?}", path);
            let file = File::open(path)
                .wrap_err_with(|| format!("Failed to open settings file '{}'", path.display()))?;
            let overrides: SettingsFile = serde_yaml::from_reader(file)
                .wrap_err_with(|| format!("Failed to parse settings file '{}'", path.display()))?;
            defaults.merge(overrides)
        }
        None => defaults,
    };
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_layout() {
        let settings = Settings::from_user_home(Path::new("/home/alice"));
        assert_eq!(settings.localnet_dir, PathBuf::from("/home/alice/.nearup/localnet"));
        assert_eq!(settings.logs_dir, PathBuf::from("/home/alice/.nearup/localnet-logs"));
        assert_eq!(settings.pid_file, PathBuf::from("/home/alice/.nearup/node.pid"));
        assert_eq!(settings.default_home, PathBuf::from("/home/alice/.near/localnet"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
logs_dir: /tmp/nearup-logs
pid_file: /tmp/nearup.pid
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let settings = load_settings(Some(temp_file.path())).unwrap();
        assert_eq!(settings.logs_dir, PathBuf::from("/tmp/nearup-logs"));
        assert_eq!(settings.pid_file, PathBuf::from("/tmp/nearup.pid"));
        assert!(settings.localnet_dir.ends_with(".nearup/localnet"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "log_dir: /tmp/typo\n").unwrap();
        assert!(load_settings(Some(temp_file.path())).is_err());
    }

    #[test]
    fn test_empty_path_rejected() {
        let settings = Settings::from_user_home(Path::new("/home/alice")).merge(SettingsFile {
            logs_dir: Some(PathBuf::new()),
            ..Default::default()
        });
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "logs_dir", .. })
        ));
    }
}
