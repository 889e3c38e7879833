//! Configuration management with layered hierarchy

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::dashboard::DeletePolicy;

/// Login delay when nothing overrides it
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 500;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    #[diagnostic(code(aerocode::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(aerocode::config::parse),
        help("valid keys are login_delay_ms, delete_policy and default_format")
    )]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {var}: {message}")]
    #[diagnostic(code(aerocode::config::env))]
    Env { var: &'static str, message: String },

    #[error("no configuration directory could be determined")]
    #[diagnostic(
        code(aerocode::config::no_home),
        help("set AEROCODE_HOME or pass --home")
    )]
    NoHome,
}

/// Dashboard configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Milliseconds a login attempt waits before resolving
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_delay_ms: Option<u64>,

    /// What deleting an aircraft does to its stages and tests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_policy: Option<DeletePolicy>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

/// Where configuration and session data live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve paths under an explicit home, or the platform directories
    pub fn resolve(home: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(home) = home {
            return Ok(Self {
                config_file: home.join("config.yaml"),
                data_dir: home.to_path_buf(),
            });
        }

        let dirs =
            directories::ProjectDirs::from("", "", "aerocode").ok_or(ConfigError::NoHome)?;
        Ok(Self {
            config_file: dirs.config_dir().join("config.yaml"),
            data_dir: dirs.data_dir().to_path_buf(),
        })
    }
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(paths: &Paths) -> Result<Self, ConfigError> {
        // 1. Built-in defaults (already in Default impl)
        let mut config = Config::default();

        // 2. Config file
        if let Some(file) = Self::read_file(&paths.config_file)? {
            config.merge(file);
        }

        // 3. Environment variables
        config.merge(Self::from_env(|var| std::env::var(var).ok())?);

        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        serde_yml::from_str(&contents)
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Settings taken from `AEROCODE_*` variables, read through `var`
    pub fn from_env<F>(var: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = var("AEROCODE_LOGIN_DELAY_MS") {
            let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::Env {
                var: "AEROCODE_LOGIN_DELAY_MS",
                message: e.to_string(),
            })?;
            config.login_delay_ms = Some(ms);
        }
        if let Some(raw) = var("AEROCODE_DELETE_POLICY") {
            let policy = raw.parse::<DeletePolicy>().map_err(|message| ConfigError::Env {
                var: "AEROCODE_DELETE_POLICY",
                message,
            })?;
            config.delete_policy = Some(policy);
        }
        if let Some(format) = var("AEROCODE_FORMAT") {
            config.default_format = Some(format);
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.login_delay_ms.is_some() {
            self.login_delay_ms = other.login_delay_ms;
        }
        if other.delete_policy.is_some() {
            self.delete_policy = other.delete_policy;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms.unwrap_or(DEFAULT_LOGIN_DELAY_MS))
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.login_delay(), Duration::from_millis(500));
        assert_eq!(config.delete_policy(), DeletePolicy::Orphan);
    }

    #[test]
    fn test_file_then_env_precedence() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(Some(tmp.path())).unwrap();
        std::fs::write(
            &paths.config_file,
            "login_delay_ms: 10\ndelete_policy: cascade\n",
        )
        .unwrap();

        let mut config = Config::read_file(&paths.config_file).unwrap().unwrap();
        assert_eq!(config.login_delay_ms, Some(10));
        assert_eq!(config.delete_policy(), DeletePolicy::Cascade);

        config.merge(Config::from_env(env(&[("AEROCODE_LOGIN_DELAY_MS", "0")])).unwrap());
        assert_eq!(config.login_delay(), Duration::ZERO);
        assert_eq!(config.delete_policy(), DeletePolicy::Cascade);
    }

    #[test]
    fn test_missing_or_empty_file_is_fine() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        assert_eq!(Config::read_file(&path).unwrap(), None);
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(Config::read_file(&path).unwrap(), None);
    }

    #[test]
    fn test_unknown_key_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "editor: vim\n").unwrap();
        assert!(matches!(
            Config::read_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_bad_env_values() {
        assert!(matches!(
            Config::from_env(env(&[("AEROCODE_LOGIN_DELAY_MS", "soon")])),
            Err(ConfigError::Env { .. })
        ));
        assert!(matches!(
            Config::from_env(env(&[("AEROCODE_DELETE_POLICY", "shred")])),
            Err(ConfigError::Env { .. })
        ));
        let config = Config::from_env(env(&[("AEROCODE_FORMAT", "json")])).unwrap();
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_home_relocates_everything() {
        let paths = Paths::resolve(Some(Path::new("/tmp/aero"))).unwrap();
        assert_eq!(paths.config_file, PathBuf::from("/tmp/aero/config.yaml"));
        assert_eq!(paths.data_dir, PathBuf::from("/tmp/aero"));
    }
}
