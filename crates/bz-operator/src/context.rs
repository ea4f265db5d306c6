//! Shared collaborators of the reporters

use bz_client::{Bug, BugzillaClient, Query};
use bz_config::OperatorConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::SyncError;
use crate::recorder::{EventRecorder, LogRecorder};
use crate::slack::ChannelClient;
use crate::store::StateStore;

/// Everything a reporter cycle needs from the outside world
///
/// Cheap to clone; the scheduler hands every reporter its own copy with a
/// recorder named after it.
#[derive(Clone)]
pub struct ControllerContext {
    client: Arc<dyn BugzillaClient>,
    slack: Arc<dyn ChannelClient>,
    store: Arc<dyn StateStore>,
    recorder: Arc<dyn EventRecorder>,
    config: Arc<OperatorConfig>,
    cancel: CancellationToken,
}

impl ControllerContext {
    pub fn new(
        client: Arc<dyn BugzillaClient>,
        slack: Arc<dyn ChannelClient>,
        store: Arc<dyn StateStore>,
        config: Arc<OperatorConfig>,
    ) -> Self {
        Self {
            client,
            slack,
            store,
            recorder: Arc::new(LogRecorder::new("operator")),
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn EventRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    pub fn recorder(&self) -> &dyn EventRecorder {
        self.recorder.as_ref()
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run a search, failing early when the context is cancelled
    pub async fn search(&self, query: &Query) -> Result<Vec<Bug>, SyncError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SyncError::Cancelled),
            result = self.client.search(query) => result.map_err(SyncError::Search),
        }
    }

    async fn deliver<F>(&self, target: &str, send: F) -> bool
    where
        F: std::future::Future<Output = anyhow::Result<()>>,
    {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(anyhow::anyhow!("cancelled")),
            result = send => result,
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                let message = format!("Failed to deliver to {}: {:#}", target, e);
                self.recorder.warning("DeliveryFailed", &message);
                false
            }
        }
    }

    /// Post to the report channel; failures are recorded, never returned
    pub async fn notify_channel(&self, text: &str) -> bool {
        self.deliver("channel", self.slack.message_channel(text)).await
    }

    pub async fn notify_admin(&self, text: &str) -> bool {
        self.deliver("admin channel", self.slack.message_admin_channel(text))
            .await
    }

    pub async fn notify_email(&self, email: &str, text: &str) -> bool {
        self.deliver(&format!("{:?}", email), self.slack.message_email(email, text))
            .await
    }
}
