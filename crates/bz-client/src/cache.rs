//! In-memory response cache
//!
//! Responses are keyed by method, URL and parameters and expire after a
//! fixed time-to-live.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default time-to-live for cached search results
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A cached response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub body: String,
    pub status_code: u16,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    response: CachedResponse,
    stored_at: Instant,
}

/// Response cache shared between client instances
#[derive(Debug, Clone)]
pub struct ApiCache {
    entries: HashMap<String, Entry>,
    ttl: Duration,
    hits: u64,
    misses: u64,
}

impl Default for ApiCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl ApiCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            hits: 0,
            misses: 0,
        }
    }

    fn key(method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let mut key = format!("{} {}", method, url);
        for (k, v) in params {
            key.push_str(&format!("&{}={}", k, v));
        }
        key
    }

    /// Look up a fresh entry, counting the hit or miss
    pub fn get(
        &mut self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Option<CachedResponse> {
        let key = Self::key(method, url, params);
        let fresh = self
            .entries
            .get(&key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.response.clone());

        match fresh {
            Some(response) => {
                self.hits += 1;
                Some(response)
            }
            None => {
                self.misses += 1;
                self.entries.remove(&key);
                None
            }
        }
    }

    /// Store a response, dropping every entry that has expired meanwhile
    pub fn set(
        &mut self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        response: &CachedResponse,
    ) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.stored_at.elapsed() < ttl);
        self.entries.insert(
            Self::key(method, url, params),
            Entry {
                response: response.clone(),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}
