//! Bugzilla REST client with caching support
//!
//! This crate provides a trait-based Bugzilla client with optional caching.
//! The design follows the decorator pattern, allowing caching behavior to be
//! composed with the base client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │             BugzillaClient trait                 │
//! │  - search(query)                                 │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌──────────────────────┐
//! │   RestClient    │         │ CachedBugzillaClient │
//! │ (direct API)    │◄────────│ (decorator)          │
//! └─────────────────┘         └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bz_client::{ApiCache, BugzillaClient, CacheMode, CachedBugzillaClient, Query, RestClient};
//! use std::sync::{Arc, Mutex};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let direct = RestClient::new("https://bugzilla.redhat.com", Some("key".to_string()))?;
//!
//! let cache = Arc::new(Mutex::new(ApiCache::default()));
//! let cached = CachedBugzillaClient::new(direct, cache, CacheMode::ReadWrite);
//!
//! let bugs = cached.search(&Query::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cached_client;
pub mod client;
pub mod credentials;
pub mod rest_client;
pub mod types;

/// Default Bugzilla instance
pub const DEFAULT_BUGZILLA_URL: &str = "https://bugzilla.redhat.com";

pub use cache::{ApiCache, CacheStats, CachedResponse};
pub use cached_client::CachedBugzillaClient;
pub use client::{BugzillaClient, CacheMode};
pub use credentials::TokenResolver;
pub use rest_client::RestClient;
pub use types::{AdvancedQuery, Bug, ExternalBug, ExternalBugType, Flag, Query};
