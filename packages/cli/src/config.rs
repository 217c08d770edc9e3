use anyhow::Context;
use blockpage_persistence::{
    LocalStorage, LocalStorageAdapter, RemoteAdapter, RemoteConfig, ACCESS_TOKEN_ENV,
    DEFAULT_BACKUP_LIMIT, SPACE_ID_ENV,
};
use blockpage_workspace::{SaveConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "blockpage.config.json";

/// Blockpage configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Root directory for local layout storage
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    #[serde(default)]
    pub autosave: AutosaveOptions,

    /// Undo levels kept per session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Local backups kept after each save
    #[serde(default = "default_backup_limit")]
    pub backup_limit: usize,

    #[serde(default)]
    pub remote: RemoteOptions,

    #[serde(default)]
    pub server: ServerOptions,
}

fn default_storage_dir() -> String {
    ".blockpage".to_string()
}

fn default_history_limit() -> usize {
    50
}

fn default_backup_limit() -> usize {
    DEFAULT_BACKUP_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    2000
}

impl Default for AutosaveOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// CMS credentials. The environment wins over the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

fn default_environment() -> String {
    "master".to_string()
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            space_id: None,
            access_token: None,
            environment: default_environment(),
            endpoint: None,
        }
    }
}

impl RemoteOptions {
    /// Merge file settings with variables looked up through `env`
    pub fn resolve_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<RemoteConfig> {
        let pick = |name: &str, fallback: &Option<String>| {
            env(name)
                .filter(|value| !value.is_empty())
                .or_else(|| fallback.clone().filter(|value| !value.is_empty()))
        };

        let space_id = pick(SPACE_ID_ENV, &self.space_id)?;
        let access_token = pick(ACCESS_TOKEN_ENV, &self.access_token)?;

        let mut config = RemoteConfig::new(space_id, access_token);
        config.environment = self.environment.clone();
        config.endpoint = self.endpoint.clone();
        Some(config)
    }

    pub fn resolve(&self) -> Option<RemoteConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the storage directory
    pub fn get_storage_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.storage_dir)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            save: SaveConfig {
                enabled: self.autosave.enabled,
                debounce: Duration::from_millis(self.autosave.debounce_ms),
                ..SaveConfig::default()
            },
            history_limit: self.history_limit,
        }
    }

    pub fn local_adapter(&self, cwd: &str) -> Arc<LocalStorageAdapter> {
        let storage = LocalStorage::new(self.get_storage_dir(cwd));
        Arc::new(LocalStorageAdapter::new(storage).with_backup_limit(self.backup_limit))
    }

    pub fn remote_adapter(&self) -> anyhow::Result<Arc<RemoteAdapter>> {
        let adapter = RemoteAdapter::new(self.remote.resolve())
            .context("Failed to create CMS client")?;
        Ok(Arc::new(adapter))
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("Invalid server address {}", addr))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            autosave: AutosaveOptions::default(),
            history_limit: default_history_limit(),
            backup_limit: default_backup_limit(),
            remote: RemoteOptions::default(),
            server: ServerOptions::default(),
        }
    }
}
