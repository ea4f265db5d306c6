//! Notification delivery
//!
//! `ChannelClient` is what the reporters talk to. `SlackClient` implements it
//! on top of the Slack Web API (`chat.postMessage`, `users.lookupByEmail`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use bz_config::SlackConfig;
use log::debug;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Destinations a reporter can post to
#[async_trait]
pub trait ChannelClient: Send + Sync {
    /// Post to the shared report channel
    async fn message_channel(&self, text: &str) -> Result<()>;

    /// Post to the operators' channel
    async fn message_admin_channel(&self, text: &str) -> Result<()>;

    /// Direct message to the person with the given Bugzilla login
    async fn message_email(&self, email: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    id: String,
}

/// Slack Web API client
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    channel: String,
    admin_channel: String,
    debug: bool,
    bugzilla_to_slack: BTreeMap<String, String>,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, config: &SlackConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("bugzilla-operator/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: DEFAULT_SLACK_API_URL.to_string(),
            token: token.into(),
            channel: config.channel.clone(),
            admin_channel: config.admin_channel.clone(),
            debug: config.debug,
            bugzilla_to_slack: config.bugzilla_to_slack.clone(),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Slack address of a Bugzilla login
    pub fn slack_email<'a>(&'a self, bugzilla_login: &'a str) -> &'a str {
        self.bugzilla_to_slack
            .get(bugzilla_login)
            .map(String::as_str)
            .unwrap_or(bugzilla_login)
    }

    fn check(method: &str, response: SlackResponse) -> Result<SlackResponse> {
        if response.ok {
            Ok(response)
        } else {
            anyhow::bail!(
                "Slack {} failed: {}",
                method,
                response.error.as_deref().unwrap_or("unknown error")
            )
        }
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        debug!("Posting {} bytes to {}", text.len(), channel);
        let response: SlackResponse = self
            .http
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(&self.token)
            .json(&json!({ "channel": channel, "text": text }))
            .send()
            .await
            .with_context(|| format!("Failed to post message to {}", channel))?
            .json()
            .await
            .context("Failed to parse chat.postMessage response")?;

        Self::check("chat.postMessage", response).map(|_| ())
    }

    async fn lookup_user_id(&self, email: &str) -> Result<String> {
        let response: SlackResponse = self
            .http
            .get(format!("{}/users.lookupByEmail", self.api_url))
            .bearer_auth(&self.token)
            .query(&[("email", email)])
            .send()
            .await
            .with_context(|| format!("Failed to look up Slack user {}", email))?
            .json()
            .await
            .context("Failed to parse users.lookupByEmail response")?;

        Self::check("users.lookupByEmail", response)?
            .user
            .map(|u| u.id)
            .with_context(|| format!("No Slack user returned for {}", email))
    }
}

#[async_trait]
impl ChannelClient for SlackClient {
    async fn message_channel(&self, text: &str) -> Result<()> {
        if self.debug {
            return self
                .post_message(&self.admin_channel, &format!("CHANNEL MESSAGE:\n{}", text))
                .await;
        }
        self.post_message(&self.channel, text).await
    }

    async fn message_admin_channel(&self, text: &str) -> Result<()> {
        self.post_message(&self.admin_channel, text).await
    }

    async fn message_email(&self, email: &str, text: &str) -> Result<()> {
        let email = self.slack_email(email);
        if self.debug {
            return self
                .post_message(&self.admin_channel, &format!("DM to {}:\n{}", email, text))
                .await;
        }
        let user_id = self.lookup_user_id(email).await?;
        self.post_message(&user_id, text).await
    }
}

/// Writes every message to the log instead of posting it
#[derive(Debug, Clone, Default)]
pub struct LogChannel;

#[async_trait]
impl ChannelClient for LogChannel {
    async fn message_channel(&self, text: &str) -> Result<()> {
        log::info!("channel message:\n{}", text);
        Ok(())
    }

    async fn message_admin_channel(&self, text: &str) -> Result<()> {
        log::info!("admin channel message:\n{}", text);
        Ok(())
    }

    async fn message_email(&self, email: &str, text: &str) -> Result<()> {
        log::info!("message to {}:\n{}", email, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SlackConfig {
        let mut config = SlackConfig {
            channel: "#forum".to_string(),
            admin_channel: "#bots".to_string(),
            ..SlackConfig::default()
        };
        config
            .bugzilla_to_slack
            .insert("jdoe@redhat.com".to_string(), "john@example.com".to_string());
        config
    }

    #[test]
    fn test_slack_email_mapping() {
        let client = SlackClient::new("xoxb-test", &config()).unwrap();
        assert_eq!(client.slack_email("jdoe@redhat.com"), "john@example.com");
        assert_eq!(client.slack_email("other@redhat.com"), "other@redhat.com");
    }

    #[test]
    fn test_with_api_url_trims_slash() {
        let client = SlackClient::new("xoxb-test", &config())
            .unwrap()
            .with_api_url("http://localhost:9999/api/");
        assert_eq!(client.api_url, "http://localhost:9999/api");
    }

    #[test]
    fn test_check_response() {
        let ok: SlackResponse = serde_json::from_str(r#"{"ok":true,"user":{"id":"U1"}}"#).unwrap();
        assert_eq!(SlackClient::check("x", ok).unwrap().user.unwrap().id, "U1");

        let failed: SlackResponse =
            serde_json::from_str(r#"{"ok":false,"error":"channel_not_found"}"#).unwrap();
        let err = SlackClient::check("chat.postMessage", failed).unwrap_err();
        assert_eq!(err.to_string(), "Slack chat.postMessage failed: channel_not_found");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_error() {
        let client = SlackClient::new("xoxb-test", &config())
            .unwrap()
            .with_api_url("http://127.0.0.1:9");
        assert!(client.message_admin_channel("hello").await.is_err());
    }
}
