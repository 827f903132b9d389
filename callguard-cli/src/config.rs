//! CLI Configuration

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use callguard_core::{SignalingConfig, SqliteStore};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory for storage.
    pub data_dir: PathBuf,
    /// Fraud-scoring endpoint from the command line, if given.
    pub endpoint: Option<String>,
}

impl CliConfig {
    /// Returns the storage path for CallGuard data.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("callguard.db")
    }

    /// Opens the local store, creating the data directory if needed.
    pub fn open_store(&self) -> Result<Arc<SqliteStore>> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Cannot create data directory {:?}", self.data_dir))?;
        let store = SqliteStore::open(self.storage_path())
            .with_context(|| format!("Cannot open {:?}", self.storage_path()))?;
        Ok(Arc::new(store))
    }

    /// Signaling settings: environment first, `--endpoint` on top.
    pub fn signaling_config(&self) -> Result<SignalingConfig> {
        let config = SignalingConfig::from_env()?;
        Ok(match &self.endpoint {
            Some(endpoint) => config.with_endpoint(endpoint.clone()),
            None => config,
        })
    }
}
