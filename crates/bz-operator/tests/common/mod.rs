#![allow(dead_code)]

use async_trait::async_trait;
use bz_client::{Bug, BugzillaClient, Query};
use bz_config::OperatorConfig;
use bz_operator::recorder::MemoryRecorder;
use bz_operator::slack::ChannelClient;
use bz_operator::store::{MemoryStateStore, StateStore};
use bz_operator::ControllerContext;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Tracker returning a fixed result and remembering every query
#[derive(Clone, Default)]
pub struct MockClient {
    bugs: Vec<Bug>,
    fail: bool,
    pub queries: Arc<Mutex<Vec<Query>>>,
}

impl MockClient {
    pub fn returning(bugs: Vec<Bug>) -> Self {
        Self {
            bugs,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BugzillaClient for MockClient {
    async fn search(&self, query: &Query) -> anyhow::Result<Vec<Bug>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self.bugs.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Channel(String),
    Admin(String),
    Email(String, String),
}

/// Notifier recording what was delivered; emails to `failing` recipients fail
#[derive(Clone, Default)]
pub struct RecordingChannel {
    pub sent: Arc<Mutex<Vec<Sent>>>,
    failing: BTreeSet<String>,
}

impl RecordingChannel {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            failing: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn emails(&self) -> Vec<(String, String)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Email(to, text) => Some((to, text)),
                _ => None,
            })
            .collect()
    }

    pub fn admin(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Admin(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn channel(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Channel(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChannelClient for RecordingChannel {
    async fn message_channel(&self, text: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(Sent::Channel(text.to_string()));
        Ok(())
    }

    async fn message_admin_channel(&self, text: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(Sent::Admin(text.to_string()));
        Ok(())
    }

    async fn message_email(&self, email: &str, text: &str) -> anyhow::Result<()> {
        if self.failing.contains(email) {
            anyhow::bail!("users_not_found");
        }
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Email(email.to_string(), text.to_string()));
        Ok(())
    }
}

/// Store whose writes always fail
pub struct ReadOnlyStore(pub MemoryStateStore);

#[async_trait]
impl StateStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> anyhow::Result<String> {
        self.0.get(key).await
    }

    async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("read-only file system")
    }
}

pub const CONFIG: &str = r#"
    [release]
    current_target_release = "4.6.0"
    target_releases = ["4.6.0", "4.5.z"]

    [components.kube-apiserver]
    lead = "lead@redhat.com"
    developers = ["a@redhat.com", "b@redhat.com", "apiserver-team"]

    [components.etcd]
    lead = "lead@redhat.com"
    developers = ["a@redhat.com", "g@redhat.com"]

    [groups]
    apiserver-team = ["c@redhat.com", "d@redhat.com", "e@redhat.com", "f@redhat.com"]

    [schedules]
    components = ["kube-apiserver", "etcd"]
"#;

pub fn config() -> OperatorConfig {
    OperatorConfig::from_toml_str(CONFIG).unwrap()
}

pub fn components() -> Vec<String> {
    config().schedules.components
}

pub struct Harness {
    pub ctx: ControllerContext,
    pub client: MockClient,
    pub channel: RecordingChannel,
    pub recorder: MemoryRecorder,
}

pub fn harness(
    client: MockClient,
    channel: RecordingChannel,
    store: Arc<dyn StateStore>,
) -> Harness {
    let recorder = MemoryRecorder::new();
    let ctx = ControllerContext::new(
        Arc::new(client.clone()),
        Arc::new(channel.clone()),
        store,
        Arc::new(config()),
    )
    .with_recorder(Arc::new(recorder.clone()));

    Harness {
        ctx,
        client,
        channel,
        recorder,
    }
}

pub fn bug(id: u64, assignee: &str) -> Bug {
    Bug {
        id,
        assigned_to: assignee.to_string(),
        component: vec!["kube-apiserver".to_string()],
        status: "ASSIGNED".to_string(),
        severity: "high".to_string(),
        priority: "high".to_string(),
        target_release: vec!["4.6.0".to_string()],
        keywords: vec!["UpcomingSprint".to_string()],
        summary: format!("bug {}", id),
        ..Bug::default()
    }
}
