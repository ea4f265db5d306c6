//! reqwest-based Bugzilla REST client
//!
//! Direct implementation of the `BugzillaClient` trait against the
//! `/rest/bug` search endpoint. This client makes real API calls without
//! any caching.

use crate::client::BugzillaClient;
use crate::types::{Bug, Query};
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-BUGZILLA-API-KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    bugs: Vec<Bug>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

/// Direct Bugzilla REST client
///
/// It can be wrapped by `CachedBugzillaClient` to add caching behavior.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestClient {
    /// Create a client for the Bugzilla instance at `base_url`
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("bugzilla-operator/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_http_client(http, base_url, api_key))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn search_url(&self, query: &Query) -> String {
        format!("{}/rest/bug?{}", self.base_url, query.encode())
    }
}

#[async_trait]
impl BugzillaClient for RestClient {
    async fn search(&self, query: &Query) -> Result<Vec<Bug>> {
        let url = self.search_url(query);
        debug!("Searching bugs: {}", url);

        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Bugzilla search request to {} failed", self.base_url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Bugzilla search response")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| match e.code {
                    Some(code) => format!("{} (code {})", e.message, code),
                    None => e.message,
                })
                .unwrap_or(body);
            anyhow::bail!("Bugzilla search failed with {}: {}", status, message);
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).context("Failed to parse Bugzilla search response")?;

        debug!("Fetched {} bugs", parsed.bugs.len());
        Ok(parsed.bugs)
    }
}
