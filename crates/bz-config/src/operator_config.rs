//! Operator configuration
//!
//! Configuration loaded from `bugzilla-operator.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::groups::expand_groups;

/// Top-level operator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorConfig {
    #[serde(default)]
    pub bugzilla: BugzillaConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    /// Component name to lead and developers
    #[serde(default)]
    pub components: BTreeMap<String, Component>,

    /// Group name to members; members may name other groups
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub schedules: SchedulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugzillaConfig {
    #[serde(default = "default_bugzilla_url")]
    pub base_url: String,

    /// API key, `BUGZILLA_API_KEY` takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_bugzilla_url() -> String {
    "https://bugzilla.redhat.com".to_string()
}

impl Default for BugzillaConfig {
    fn default() -> Self {
        Self {
            base_url: default_bugzilla_url(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Channel receiving the shared reports
    #[serde(default)]
    pub channel: String,

    /// Channel receiving operational and debug messages
    #[serde(default)]
    pub admin_channel: String,

    /// Bot token, `SLACK_BOT_TOKEN` takes precedence
    #[serde(default)]
    pub token: Option<String>,

    /// Route every message to the admin channel
    #[serde(default)]
    pub debug: bool,

    /// Bugzilla login to Slack email, for people whose addresses differ
    #[serde(default)]
    pub bugzilla_to_slack: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// The release currently being stabilised (e.g. "4.6.0")
    #[serde(default)]
    pub current_target_release: String,

    /// Every release whose bugs are tracked
    #[serde(default)]
    pub target_releases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub lead: String,

    /// Developer identifiers or group names
    #[serde(default)]
    pub developers: Vec<String>,
}

/// Interval for one reporter; a reporter without a schedule does not run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterSchedule {
    pub interval_secs: u64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulesConfig {
    /// Components the reporters cover
    #[serde(default)]
    pub components: Vec<String>,

    #[serde(default)]
    pub new_bugs: Option<ReporterSchedule>,

    #[serde(default)]
    pub blockers: Option<ReporterSchedule>,

    #[serde(default)]
    pub escalation: Option<ReporterSchedule>,
}

impl OperatorConfig {
    /// Load config from the given path, CWD, or home directory
    ///
    /// A file that exists but does not parse is an error. Without any file
    /// the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match crate::load_config_file(explicit) {
            Some((path, content)) => {
                let config = Self::from_toml_str(&content)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;
                log::info!("Loaded operator config from {}", path.display());
                Ok(config)
            }
            None if explicit.is_some() => Err(anyhow::anyhow!(
                "Config file {} could not be read",
                explicit.map(|p| p.display().to_string()).unwrap_or_default()
            )),
            None => {
                log::warn!("No config file found, using default operator config");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid operator configuration")
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// Flattened team of a lead: developers of every component they lead,
    /// with groups expanded
    pub fn team_of(&self, lead: &str) -> std::collections::BTreeSet<String> {
        let roots: Vec<&str> = self
            .components
            .values()
            .filter(|c| c.lead == lead)
            .flat_map(|c| c.developers.iter().map(String::as_str))
            .collect();
        expand_groups(&self.groups, &roots)
    }
}
