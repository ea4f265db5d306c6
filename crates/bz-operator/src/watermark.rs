//! Highest bug id the new-bug reporter has already seen, per component set

use anyhow::Result;

use crate::error::SyncError;
use crate::store::StateStore;

const KEY_PREFIX: &str = "new-bug-reporter.state-";

/// State store key of the watermark for `components`
pub fn state_key(components: &[String]) -> String {
    format!("{}{}", KEY_PREFIX, components.join("-"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermark {
    key: String,
    value: u64,
}

impl Watermark {
    /// Interpret a stored value; unset or unparsable values start from 0
    pub fn parse(key: impl Into<String>, raw: &str) -> Self {
        let key = key.into();
        let raw = raw.trim();
        let value = if raw.is_empty() {
            0
        } else {
            match raw.parse::<u64>() {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("Cannot parse state value {:?} for {}: {}", raw, key, e);
                    0
                }
            }
        };
        Self { key, value }
    }

    pub async fn load(store: &dyn StateStore, key: &str) -> Result<Self> {
        let raw = store.get(key).await?;
        Ok(Self::parse(key, &raw))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Advance past every id in `ids`; never moves backwards
    pub fn observe(&mut self, ids: impl IntoIterator<Item = u64>) {
        if let Some(max) = ids.into_iter().max() {
            self.value = self.value.max(max);
        }
    }

    pub async fn persist(&self, store: &dyn StateStore) -> Result<()> {
        store.set(&self.key, &self.value.to_string()).await
    }
}

/// Merge a cycle result with the result of the persist that followed it
///
/// The cycle's error is returned when both failed.
pub fn first_error<T>(cycle: Result<T, SyncError>, persist: Result<()>) -> Result<T, SyncError> {
    match (cycle, persist) {
        (Err(e), Err(persist_err)) => {
            log::warn!("Persisting state after a failed cycle also failed: {:#}", persist_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(_), Err(persist_err)) => Err(SyncError::State(persist_err)),
        (Ok(value), Ok(())) => Ok(value),
    }
}
