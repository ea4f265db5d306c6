//! Persistent key/value state of the reporters
//!
//! The file store keeps every key in one TOML document:
//!
//! ```toml
//! [meta]
//! last_modified = "2026-10-14T08:00:00Z"
//! version = 1
//!
//! [values]
//! "new-bug-reporter.state-etcd-kube-apiserver" = "1834567"
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const STATE_VERSION: u32 = 1;

/// Key/value storage shared by the reporters, keys are namespaced by their users
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Value of `key`, or an empty string when it was never set
    async fn get(&self, key: &str) -> Result<String>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Non-persistent store for `report` runs and tests
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<String> {
        Ok(self.values.lock().await.get(key).cloned().unwrap_or_default())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateMeta {
    last_modified: DateTime<Utc>,
    version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateFile {
    meta: StateMeta,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            meta: StateMeta {
                last_modified: Utc::now(),
                version: STATE_VERSION,
            },
            values: BTreeMap::new(),
        }
    }
}

/// Store backed by a TOML file
pub struct FileStateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the default location in the user cache directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(bz_config::state_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document; an unparsable file reads as empty and is replaced on the next write
    fn read(&self) -> Result<StateFile> {
        if !self.path.exists() {
            return Ok(StateFile::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {:?}", self.path))?;
        match toml::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                log::warn!("Ignoring unparsable state file {:?}: {}", self.path, e);
                Ok(StateFile::default())
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write(&self, state: &StateFile) -> Result<()> {
        let content = toml::to_string_pretty(state).context("Failed to serialize state")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write aside and rename, readers never see a partial document
        let temp = self.temp_path();
        fs::write(&temp, content)
            .with_context(|| format!("Failed to write state file: {:?}", temp))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("Failed to replace state file: {:?}", self.path))?;
        log::debug!("Saved state to {:?}", self.path);
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, key: &str) -> Result<String> {
        let _guard = self.lock.lock().await;
        Ok(self.read()?.values.get(key).cloned().unwrap_or_default())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut state = self.read()?;
        state.values.insert(key.to_string(), value.to_string());
        state.meta.last_modified = Utc::now();
        state.meta.version = STATE_VERSION;
        self.write(&state)
    }
}
