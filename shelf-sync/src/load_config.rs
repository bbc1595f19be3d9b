/// `load_config` module: Loads a static YAML config and injects credentials from the environment.
///
/// This module is the only place where untrusted YAML is parsed and mapped to the
/// strongly-typed settings the pipeline runs on.
///
/// # Responsibilities
/// - Parse the YAML file into the `sync`, `api` and `logging` sections
/// - Read the Basic-auth credentials from `ESL_BASIC_USER` / `ESL_BASIC_PASSWORD`
/// - Fail with a clear diagnostic on any missing or invalid value
///
/// Secrets are never read from the file.
use anyhow::{Context, Result};
use serde::Deserialize;
use shelf_sync_core::config::SyncConfig;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

pub const USER_ENV: &str = "ESL_BASIC_USER";
pub const PASSWORD_ENV: &str = "ESL_BASIC_PASSWORD";

#[derive(Debug)]
pub struct AppConfig {
    pub sync: SyncConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_token_timeout_secs")]
    pub token_timeout_secs: u64,
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
}

impl ApiConfig {
    pub fn token_timeout(&self) -> Duration {
        Duration::from_secs(self.token_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
    /// Rotated files to keep; defaults to the archive retention window in days.
    #[serde(default)]
    pub max_files: Option<usize>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file_prefix: default_log_file_prefix(),
            max_files: None,
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        let username = std::env::var(USER_ENV).map_err(|e| {
            error!(error = ?e, "{USER_ENV} environment variable not set");
            anyhow::anyhow!("{USER_ENV} environment variable not set: {e}")
        })?;
        let password = std::env::var(PASSWORD_ENV).map_err(|e| {
            error!(error = ?e, "{PASSWORD_ENV} environment variable not set");
            anyhow::anyhow!("{PASSWORD_ENV} environment variable not set: {e}")
        })?;
        info!(username_set = !username.is_empty(), "Credentials found in env");
        Ok(Self { username, password })
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    sync: SyncConfig,
    api: ApiConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

/// Loads a static YAML config file (no secrets) and injects required env vars for secrets.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref)
        .map_err(|e| {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            e
        })
        .with_context(|| format!("Failed to read config file {path_ref:?}"))?;

    let mut raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    raw.api.base_url = raw.api.base_url.trim_end_matches('/').to_string();
    if raw.api.base_url.is_empty() {
        anyhow::bail!("api.base_url must not be empty");
    }
    if raw.sync.store.customer_code.is_empty() || raw.sync.store.store_code.is_empty() {
        anyhow::bail!("sync.store.customer_code and sync.store.store_code must not be empty");
    }
    if raw.logging.max_files.is_none() {
        raw.logging.max_files = Some(raw.sync.retention_days.max(1) as usize);
    }

    let credentials = Credentials::from_env()?;

    raw.sync.trace_loaded();
    info!(
        base_url = %raw.api.base_url,
        token_timeout_secs = raw.api.token_timeout_secs,
        upload_timeout_secs = raw.api.upload_timeout_secs,
        "Config loaded and merged successfully"
    );

    Ok(AppConfig {
        sync: raw.sync,
        api: raw.api,
        logging: raw.logging,
        credentials,
    })
}

fn default_token_timeout_secs() -> u64 {
    15
}

fn default_upload_timeout_secs() -> u64 {
    60
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file_prefix() -> String {
    "shelf-sync.log".to_string()
}
