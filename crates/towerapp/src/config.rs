//! # Configuration
//!
//! Settings are resolved once per invocation, in priority order:
//! 1. **Command-line flags**: `--url`, `--access-token`.
//! 2. **Environment variables**: `TOWER_API_ENDPOINT`, `TOWER_ACCESS_TOKEN` and the
//!    reference defaults listed below.
//! 3. **Config file**: `config.toml` in the OS config directory (via `directories`), or
//!    the file named by `TW_CONFIG`.
//! 4. **Compiled defaults**: the public platform endpoint.
//!
//! ## Reference defaults
//!
//! | Variable | Used when |
//! |----------|-----------|
//! | `TOWER_WORKSPACE_ID` | `-w` is omitted |
//! | `TOWER_WORKSPACE_NAME` | `-w` is omitted and no workspace id is set |
//! | `TOWER_ORGANIZATION_ID` | `-o` is omitted |
//! | `TOWER_ORGANIZATION_NAME` | `-o` is omitted and no organization id is set |
//!
//! Loading goes through a lookup function rather than `std::env`, so tests can feed
//! variables without touching the process environment.

use crate::error::{Result, TowerError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://api.cloud.seqera.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_ENDPOINT: &str = "TOWER_API_ENDPOINT";
pub const ENV_ACCESS_TOKEN: &str = "TOWER_ACCESS_TOKEN";
pub const ENV_WORKSPACE_ID: &str = "TOWER_WORKSPACE_ID";
pub const ENV_WORKSPACE_NAME: &str = "TOWER_WORKSPACE_NAME";
pub const ENV_ORGANIZATION_ID: &str = "TOWER_ORGANIZATION_ID";
pub const ENV_ORGANIZATION_NAME: &str = "TOWER_ORGANIZATION_NAME";
pub const ENV_CONFIG: &str = "TW_CONFIG";

/// Reference defaults, consulted only when the matching flag is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvDefaults {
    pub workspace_id: Option<String>,
    pub workspace_name: Option<String>,
    pub organization_id: Option<String>,
    pub organization_name: Option<String>,
}

impl EnvDefaults {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            workspace_id: get(ENV_WORKSPACE_ID),
            workspace_name: get(ENV_WORKSPACE_NAME),
            organization_id: get(ENV_ORGANIZATION_ID),
            organization_name: get(ENV_ORGANIZATION_NAME),
        }
    }

    /// Workspace fallbacks in the order they are tried.
    pub fn workspace(&self) -> [Option<&str>; 2] {
        [
            self.workspace_id.as_deref(),
            self.workspace_name.as_deref(),
        ]
    }

    pub fn organization(&self) -> [Option<&str>; 2] {
        [
            self.organization_id.as_deref(),
            self.organization_name.as_deref(),
        ]
    }

    /// Fills unset fields from `other`.
    fn or(self, other: EnvDefaults) -> Self {
        Self {
            workspace_id: self.workspace_id.or(other.workspace_id),
            workspace_name: self.workspace_name.or(other.workspace_name),
            organization_id: self.organization_id.or(other.organization_id),
            organization_name: self.organization_name.or(other.organization_name),
        }
    }
}

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub workspace: Option<String>,
    pub organization: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| TowerError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerConfig {
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub defaults: EnvDefaults,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            defaults: EnvDefaults::default(),
        }
    }
}

impl TowerConfig {
    /// Resolves the configuration from flags, `lookup` and the config file.
    pub fn load<F>(overrides: &ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match config_path(&lookup) {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading config file");
                FileConfig::load(&path)?
            }
            _ => FileConfig::default(),
        };
        Ok(Self::resolve(overrides, &lookup, file))
    }

    pub fn resolve<F>(overrides: &ConfigOverrides, lookup: F, file: FileConfig) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let file_defaults = EnvDefaults {
            workspace_name: file.workspace,
            organization_name: file.organization,
            ..Default::default()
        };
        Self {
            endpoint: overrides
                .endpoint
                .clone()
                .or_else(|| env(ENV_ENDPOINT))
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            access_token: overrides
                .access_token
                .clone()
                .or_else(|| env(ENV_ACCESS_TOKEN))
                .or(file.access_token),
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            defaults: EnvDefaults::from_lookup(&lookup).or(file_defaults),
        }
    }
}

/// `TW_CONFIG`, else `config.toml` in the platform config directory.
pub fn config_path<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(ENV_CONFIG).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("io", "seqera", "tw").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
