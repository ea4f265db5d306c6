use async_trait::async_trait;

use super::{record_search_failure, Reporter};
use crate::context::ControllerContext;
use crate::error::SyncError;
use crate::escalation::aggregate_escalations;
use crate::query::urgent_severity_query;
use crate::report::{escalation_report, missing_components_message};

/// Escalation report text, `None` when there is nothing to report
///
/// Components missing from the configuration are reported to the admin
/// channel on the way.
pub async fn report(
    ctx: &ControllerContext,
    components: &[String],
) -> Result<Option<String>, SyncError> {
    let bugs = ctx
        .search(&urgent_severity_query(components))
        .await
        .inspect_err(|e| record_search_failure(ctx, "BugSearchFailed", e))?;

    let summary = aggregate_escalations(&bugs, ctx.config());
    if let Some(message) = missing_components_message(&summary.missing_components) {
        ctx.notify_admin(&message).await;
    }

    Ok(escalation_report(&summary))
}

/// Posts escalations per lead with their quota verdict
pub struct EscalationReporter {
    components: Vec<String>,
}

impl EscalationReporter {
    pub fn new(components: Vec<String>) -> Self {
        Self { components }
    }
}

#[async_trait]
impl Reporter for EscalationReporter {
    fn name(&self) -> &'static str {
        "EscalationReporter"
    }

    async fn sync(&self, ctx: &ControllerContext) -> Result<(), SyncError> {
        match report(ctx, &self.components).await? {
            Some(report) => {
                ctx.notify_channel(&report).await;
            }
            None => log::debug!("No escalations to report"),
        }
        Ok(())
    }
}
