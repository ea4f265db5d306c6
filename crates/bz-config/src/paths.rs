//! State and cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.cache/bugzilla-operator/`
//! - macOS: `~/Library/Caches/bugzilla-operator/`
//! - Windows: `%LOCALAPPDATA%\bugzilla-operator\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "bugzilla-operator";

/// Get the application cache directory, creating it when missing
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
    Ok(dir)
}

/// Get path to the persisted reporter state (watermarks)
pub fn state_file_path() -> Result<PathBuf> {
    Ok(cache_dir()?.join("state.toml"))
}
