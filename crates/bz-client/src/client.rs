//! Bugzilla client trait and cache mode definitions
//!
//! This module defines the core `BugzillaClient` trait that all client
//! implementations must satisfy, as well as the `CacheMode` enum for
//! controlling caching behavior.

use crate::types::{Bug, Query};
use async_trait::async_trait;

/// Cache behavior mode for Bugzilla clients
///
/// Controls how the client interacts with the cache layer.
/// This is set at client construction time, not per-request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// No caching - neither read nor write
    None,

    /// Write-only - skip cache reads, but write responses to cache
    /// Use for "force refresh" to get fresh data while populating cache
    WriteOnly,

    /// Read-only - read from cache, but don't update it
    ReadOnly,

    /// Full caching - read from cache, write to cache
    #[default]
    ReadWrite,
}

impl CacheMode {
    /// Should we attempt to read from cache before making API call?
    pub fn should_read(&self) -> bool {
        matches!(self, CacheMode::ReadOnly | CacheMode::ReadWrite)
    }

    /// Should we write API responses to cache?
    pub fn should_write(&self) -> bool {
        matches!(self, CacheMode::WriteOnly | CacheMode::ReadWrite)
    }
}

/// Bugzilla API client trait
///
/// Implementations can be direct (hitting the REST API) or decorated
/// with caching.
///
/// Only the fields named in `Query::include_fields` are populated on the
/// returned bugs; every other field keeps its default value.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that reporters running on
/// separate tasks can share one client.
#[async_trait]
pub trait BugzillaClient: Send + Sync {
    /// Run a search and return the matching bugs in server order
    async fn search(&self, query: &Query) -> anyhow::Result<Vec<Bug>>;
}
