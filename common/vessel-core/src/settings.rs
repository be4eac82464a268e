use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::directories::Directory;

pub const DEFAULT_PRIMARY_NAME: &str = "primary";
pub const DAEMON_SOCKET_ENV: &str = "VESSEL_DAEMON_SOCKET";

/// Read-only view of the client settings needed while parsing a command line.
pub trait SettingsProvider {
    /// The configured primary instance, `None` when the primary instance is
    /// disabled.
    fn primary_name(&self) -> Option<&str>;
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default)]
    pub client: ClientSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ClientSettings {
    /// An empty name disables the primary instance.
    #[serde(default = "default_primary_name")]
    pub primary_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daemon_socket: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            primary_name: default_primary_name(),
            daemon_socket: None,
        }
    }
}

fn default_primary_name() -> String {
    DEFAULT_PRIMARY_NAME.to_string()
}

impl Settings {
    /// Loads settings from the user's config directory. A missing file yields
    /// the defaults.
    pub fn load() -> Result<Self, SettingsError> {
        match Directory::from_env().settings_file() {
            Some(path) => Self::from_path(path),
            None => {
                debug!("no config directory found, using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        let input = match fs::read_to_string(path) {
            Ok(input) => input,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "settings file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_yaml(&input).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml_ng::Error> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml_ng::from_str(input)
    }

    /// Socket the daemon listens on. `VESSEL_DAEMON_SOCKET` wins over the
    /// settings file, which wins over the per-user runtime directory.
    pub fn daemon_socket(&self) -> PathBuf {
        self.daemon_socket_with(std::env::var_os(DAEMON_SOCKET_ENV), &Directory::from_env())
    }

    fn daemon_socket_with(&self, env_override: Option<OsString>, dirs: &Directory) -> PathBuf {
        if let Some(path) = env_override.filter(|path| !path.is_empty()) {
            return PathBuf::from(path);
        }

        self.client
            .daemon_socket
            .clone()
            .unwrap_or_else(|| dirs.default_daemon_socket())
    }
}

impl SettingsProvider for Settings {
    fn primary_name(&self) -> Option<&str> {
        let name = self.client.primary_name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_path(dir.path().join("settings.yaml")).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.primary_name(), Some(DEFAULT_PRIMARY_NAME));
    }

    #[test]
    fn empty_primary_name_disables_primary() {
        let settings = Settings::from_yaml("client:\n  primary-name: \"\"\n").unwrap();

        assert_eq!(settings.primary_name(), None);
    }

    #[test]
    fn reads_primary_name_and_socket_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(
            &path,
            "client:\n  primary-name: dev\n  daemon-socket: /var/run/vesseld.sock\n",
        )
        .unwrap();

        let settings = Settings::from_path(&path).unwrap();

        assert_eq!(settings.primary_name(), Some("dev"));
        assert_eq!(
            settings.client.daemon_socket,
            Some(PathBuf::from("/var/run/vesseld.sock"))
        );
    }

    #[test]
    fn blank_file_uses_defaults() {
        assert_eq!(Settings::from_yaml("\n").unwrap(), Settings::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "client: [not, a, map]\n").unwrap();

        let err = Settings::from_path(&path).unwrap_err();

        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("settings.yaml"));
    }

    #[test]
    fn daemon_socket_precedence() {
        let dirs = Directory {
            config_home: None,
            runtime_dir: Some(PathBuf::from("/run/user/1000/vessel")),
        };
        let mut settings = Settings::default();

        assert_eq!(
            settings.daemon_socket_with(None, &dirs),
            PathBuf::from("/run/user/1000/vessel/vesseld.sock")
        );

        settings.client.daemon_socket = Some(PathBuf::from("/srv/vesseld.sock"));
        assert_eq!(
            settings.daemon_socket_with(Some(OsString::new()), &dirs),
            PathBuf::from("/srv/vesseld.sock")
        );
        assert_eq!(
            settings.daemon_socket_with(Some("/tmp/override.sock".into()), &dirs),
            PathBuf::from("/tmp/override.sock")
        );
    }
}
