//! The reporter cycles
//!
//! Each reporter runs one search per cycle, feeds the result through the
//! rule engine and posts what came out. A failed search aborts the cycle;
//! failed deliveries are recorded and the cycle carries on.

pub mod blockers;
pub mod escalation;
pub mod new_bugs;

use async_trait::async_trait;

use crate::context::ControllerContext;
use crate::error::SyncError;

pub use blockers::BlockersReporter;
pub use escalation::EscalationReporter;
pub use new_bugs::NewBugReporter;

#[async_trait]
pub trait Reporter: Send + Sync {
    /// Name used in logs and recorded events
    fn name(&self) -> &'static str;

    /// Run one cycle
    async fn sync(&self, ctx: &ControllerContext) -> Result<(), SyncError>;
}

/// Record a failed search under `reason`, cancellation is not a failure
pub(crate) fn record_search_failure(ctx: &ControllerContext, reason: &str, err: &SyncError) {
    if !matches!(err, SyncError::Cancelled) {
        ctx.recorder().warning(reason, &err.to_string());
    }
}
