use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_REQUIRED_COLUMNS: [&str; 5] =
    ["ItemID", "ItemName", "ItemNumber", "PrimaryUpc", "UnitPrice"];

/// Customer/store pair the price-sync service files records under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreIdentity {
    pub customer_code: String,
    pub store_code: String,
}

/// Immutable pipeline settings, built once at startup and handed to the watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub watch_folder: PathBuf,
    #[serde(default)]
    pub done_folder: Option<PathBuf>,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    #[serde(default = "default_required_columns")]
    pub required_columns: Vec<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: NonZeroUsize,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
    pub store: StoreIdentity,
}

impl SyncConfig {
    /// Config with every optional setting at its default.
    pub fn new(watch_folder: impl Into<PathBuf>, store: StoreIdentity) -> Self {
        Self {
            watch_folder: watch_folder.into(),
            done_folder: None,
            file_extension: default_file_extension(),
            required_columns: default_required_columns(),
            batch_size: default_batch_size(),
            poll_interval_secs: default_poll_interval_secs(),
            retention_days: default_retention_days(),
            store,
        }
    }

    /// Where fully uploaded files are archived; `<watch_folder>/done` unless overridden.
    pub fn done_folder(&self) -> PathBuf {
        self.done_folder
            .clone()
            .unwrap_or_else(|| self.watch_folder.join("done"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retention_window(&self) -> Duration {
        Duration::from_secs(self.retention_days.saturating_mul(24 * 60 * 60))
    }

    pub fn trace_loaded(&self) {
        info!(
            watch_folder = %self.watch_folder.display(),
            done_folder = %self.done_folder().display(),
            extension = %self.file_extension,
            batch_size = self.batch_size.get(),
            poll_interval_secs = self.poll_interval_secs,
            retention_days = self.retention_days,
            customer_code = %self.store.customer_code,
            store_code = %self.store.store_code,
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}

fn default_file_extension() -> String {
    "xlsx".to_string()
}

fn default_required_columns() -> Vec<String> {
    DEFAULT_REQUIRED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(1000).unwrap_or(NonZeroUsize::MIN)
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn default_retention_days() -> u64 {
    30
}
