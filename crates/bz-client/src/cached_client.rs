//! Cached Bugzilla client (decorator pattern)
//!
//! Wraps any `BugzillaClient` implementation to add caching behavior.
//! The cache mode determines whether to read from cache, write to cache, or both.

use crate::cache::{ApiCache, CachedResponse};
use crate::client::{BugzillaClient, CacheMode};
use crate::types::{Bug, Query};
use async_trait::async_trait;
use log::debug;
use std::sync::{Arc, Mutex};

const SEARCH_URL: &str = "/rest/bug";

/// Cached Bugzilla client using the decorator pattern
///
/// Several reporters run the same triage search within minutes of each other;
/// sharing one cache between them keeps the load on Bugzilla down.
///
/// # Cache Modes
///
/// - `CacheMode::None` - Pass through to inner client (no caching)
/// - `CacheMode::WriteOnly` - Skip cache reads, but write responses (force refresh)
/// - `CacheMode::ReadOnly` - Read from cache only, don't update cache
/// - `CacheMode::ReadWrite` - Full caching (default)
#[derive(Debug, Clone)]
pub struct CachedBugzillaClient<C: BugzillaClient + Clone> {
    inner: C,
    cache: Arc<Mutex<ApiCache>>,
    mode: CacheMode,
}

impl<C: BugzillaClient + Clone> CachedBugzillaClient<C> {
    pub fn new(inner: C, cache: Arc<Mutex<ApiCache>>, mode: CacheMode) -> Self {
        Self { inner, cache, mode }
    }

    fn try_cache_get(&self, params: &[(&str, &str)]) -> Option<String> {
        if !self.mode.should_read() {
            return None;
        }

        // A poisoned lock only means another task panicked mid-update;
        // treat it as a miss.
        let mut cache = self.cache.lock().ok()?;
        cache.get("GET", SEARCH_URL, params).map(|r| r.body)
    }

    fn cache_set(&self, params: &[(&str, &str)], body: String) {
        if !self.mode.should_write() {
            return;
        }

        let response = CachedResponse {
            body,
            status_code: 200,
        };

        match self.cache.lock() {
            Ok(mut cache) => cache.set("GET", SEARCH_URL, params, &response),
            Err(e) => debug!("Failed to write to cache: {}", e),
        }
    }
}

#[async_trait]
impl<C: BugzillaClient + Clone> BugzillaClient for CachedBugzillaClient<C> {
    async fn search(&self, query: &Query) -> anyhow::Result<Vec<Bug>> {
        let encoded = query.encode();
        let params = [("q", encoded.as_str())];

        if let Some(cached_body) = self.try_cache_get(&params) {
            match serde_json::from_str::<Vec<Bug>>(&cached_body) {
                Ok(bugs) => {
                    debug!("Cache HIT for search: {} bugs", bugs.len());
                    return Ok(bugs);
                }
                Err(e) => {
                    debug!("Failed to parse cached bugs: {}", e);
                    // Fall through to fetch fresh data
                }
            }
        }

        debug!("Cache MISS for search");
        let bugs = self.inner.search(query).await?;

        if let Ok(json) = serde_json::to_string(&bugs) {
            self.cache_set(&params, json);
        }

        Ok(bugs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdvancedQuery;
    use std::time::Duration;

    #[derive(Clone)]
    struct MockClient {
        bugs: Vec<Bug>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockClient {
        fn new(bugs: Vec<Bug>) -> Self {
            Self {
                bugs,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl BugzillaClient for MockClient {
        async fn search(&self, _query: &Query) -> anyhow::Result<Vec<Bug>> {
            *self.call_count.lock().unwrap() += 1;
            Ok(self.bugs.clone())
        }
    }

    fn create_test_bug(id: u64) -> Bug {
        Bug {
            id,
            summary: format!("Test bug {}", id),
            status: "NEW".to_string(),
            ..Bug::default()
        }
    }

    fn query(component: &str) -> Query {
        Query {
            component: vec![component.to_string()],
            ..Query::default()
        }
    }

    #[tokio::test]
    async fn test_cache_mode_none_skips_cache() {
        let mock = MockClient::new(vec![create_test_bug(1)]);
        let cache = Arc::new(Mutex::new(ApiCache::default()));
        let client = CachedBugzillaClient::new(mock.clone(), cache, CacheMode::None);

        client.search(&query("etcd")).await.unwrap();
        client.search(&query("etcd")).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_mode_read_write_caches() {
        let mock = MockClient::new(vec![create_test_bug(1)]);
        let cache = Arc::new(Mutex::new(ApiCache::default()));
        let client = CachedBugzillaClient::new(mock.clone(), cache, CacheMode::ReadWrite);

        let bugs1 = client.search(&query("etcd")).await.unwrap();
        let bugs2 = client.search(&query("etcd")).await.unwrap();

        assert_eq!(bugs1, bugs2);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_different_queries_do_not_share_entries() {
        let mock = MockClient::new(vec![create_test_bug(1)]);
        let cache = Arc::new(Mutex::new(ApiCache::default()));
        let client = CachedBugzillaClient::new(mock.clone(), cache, CacheMode::ReadWrite);

        client.search(&query("etcd")).await.unwrap();
        client.search(&query("kube-apiserver")).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_mode_write_only_skips_read() {
        let mock = MockClient::new(vec![create_test_bug(1)]);
        let cache = Arc::new(Mutex::new(ApiCache::default()));
        let client =
            CachedBugzillaClient::new(mock.clone(), cache.clone(), CacheMode::WriteOnly);

        client.search(&query("etcd")).await.unwrap();
        client.search(&query("etcd")).await.unwrap();
        assert_eq!(mock.call_count(), 2);

        // The refreshed data is still visible to a reading client
        let read_client = CachedBugzillaClient::new(mock.clone(), cache, CacheMode::ReadWrite);
        read_client.search(&query("etcd")).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_mode_read_only_skips_write() {
        let mock = MockClient::new(vec![create_test_bug(1)]);
        let cache = Arc::new(Mutex::new(ApiCache::default()));

        let write_client =
            CachedBugzillaClient::new(mock.clone(), cache.clone(), CacheMode::ReadWrite);
        write_client.search(&query("etcd")).await.unwrap();

        let mock2 = MockClient::new(vec![create_test_bug(2)]);
        let read_client = CachedBugzillaClient::new(mock2.clone(), cache, CacheMode::ReadOnly);
        let bugs = read_client.search(&query("etcd")).await.unwrap();

        // Cached bug #1, not the new mock's bug #2
        assert_eq!(bugs[0].id, 1);
        assert_eq!(mock2.call_count(), 0);
    }

    #[tokio::test]
    async fn test_advancing_watermark_queries_do_not_accumulate() {
        let mock = MockClient::new(Vec::new());
        let cache = Arc::new(Mutex::new(ApiCache::with_ttl(Duration::ZERO)));
        let client = CachedBugzillaClient::new(mock.clone(), cache.clone(), CacheMode::ReadWrite);

        for watermark in 0..1000 {
            let incremental = Query {
                advanced: vec![AdvancedQuery::new(
                    "bug_id",
                    "greaterthan",
                    watermark.to_string(),
                )],
                ..query("etcd")
            };
            client.search(&incremental).await.unwrap();
        }

        assert_eq!(mock.call_count(), 1000);
        assert!(cache.lock().unwrap().stats().entries <= 1);
    }
}
