//! New-bug reporter
//!
//! Announces bugs filed since the last cycle. The highest bug id seen is kept
//! in the state store, keyed by the component set.

use async_trait::async_trait;

use super::{record_search_failure, Reporter};
use crate::context::ControllerContext;
use crate::error::SyncError;
use crate::query::new_bugs_query;
use crate::report::{new_bugs_admin_message, new_bugs_report};
use crate::watermark::{first_error, state_key, Watermark};

pub struct NewBugReporter {
    components: Vec<String>,
}

impl NewBugReporter {
    pub fn new(components: Vec<String>) -> Self {
        Self { components }
    }

    pub fn state_key(&self) -> String {
        state_key(&self.components)
    }

    async fn run(
        &self,
        ctx: &ControllerContext,
        watermark: &mut Watermark,
    ) -> Result<(), SyncError> {
        let query = new_bugs_query(&self.components, watermark.value());
        let bugs = ctx.search(&query).await.inspect_err(|e| {
            record_search_failure(ctx, "BuglistFailed", e);
        })?;

        watermark.observe(bugs.iter().map(|b| b.id));
        log::info!(
            "Found {} new bugs, watermark is now {}",
            bugs.len(),
            watermark.value()
        );

        if let Some(message) = new_bugs_admin_message(&bugs) {
            ctx.notify_admin(&message).await;
        }

        Ok(())
    }
}

#[async_trait]
impl Reporter for NewBugReporter {
    fn name(&self) -> &'static str {
        "NewBugReporter"
    }

    async fn sync(&self, ctx: &ControllerContext) -> Result<(), SyncError> {
        let key = self.state_key();
        let mut watermark = Watermark::load(ctx.store(), &key)
            .await
            .map_err(SyncError::State)?;

        let result = self.run(ctx, &mut watermark).await;
        let persisted = watermark.persist(ctx.store()).await;
        first_error(result, persisted)
    }
}

/// New bugs of the last day as a report, without touching the watermark
pub async fn report(ctx: &ControllerContext, components: &[String]) -> Result<String, SyncError> {
    let bugs = ctx
        .search(&new_bugs_query(components, 0))
        .await
        .inspect_err(|e| record_search_failure(ctx, "BuglistFailed", e))?;
    Ok(new_bugs_report(&bugs))
}
