//! Secret resolution for the Bugzilla and Slack APIs
//!
//! Tries multiple sources in order:
//! 1. The named environment variable (e.g. `BUGZILLA_API_KEY`)
//! 2. The same variable loaded from a `.env` file
//! 3. A fallback value from the configuration file

use anyhow::Result;
use log::debug;

/// Resolves API tokens from the environment or configuration
#[derive(Debug, Clone, Default)]
pub struct TokenResolver;

impl TokenResolver {
    /// Create a resolver, loading `.env` once if present
    pub fn new() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded .env file from: {:?}", path),
            Err(_) => debug!(".env file not found, will rely on environment variables"),
        }

        Self
    }

    /// Resolve a token, preferring `env_key` over the configured value
    pub fn get_token(&self, env_key: &str, configured: Option<&str>) -> Result<String> {
        if let Ok(token) = std::env::var(env_key) {
            if !token.trim().is_empty() {
                debug!("Using token from env var {}", env_key);
                return Ok(token.trim().to_string());
            }
        }

        if let Some(token) = configured.filter(|t| !t.trim().is_empty()) {
            debug!("Using token from configuration for {}", env_key);
            return Ok(token.trim().to_string());
        }

        Err(anyhow::anyhow!(
            "No token found. Set {} or add it to the configuration file",
            env_key
        ))
    }
}
