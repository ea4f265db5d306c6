//! Blocker reporter
//!
//! Sends every assignee their untriaged, blocker+ and urgent bugs, posts the
//! release statistics to the report channel and a per-person breakdown to
//! the admin channel.

use async_trait::async_trait;
use bz_client::Bug;

use super::{record_search_failure, Reporter};
use crate::classify::{summarize_bugs, Category, Classification};
use crate::context::ControllerContext;
use crate::error::SyncError;
use crate::per_person::{group_per_person, index_bugs, PerPerson};
use crate::query::triage_query;
use crate::report::{
    admin_debug_stats, blockers_channel_report, channel_stats, person_messages, PersonalNotice,
};

/// Outcome of the blocker search, before anything is sent
#[derive(Debug, Clone)]
pub struct BlockersReport {
    /// Channel-wide statistics message
    pub channel: String,
    pub summary: Classification,
    pub bugs: Vec<Bug>,
}

impl BlockersReport {
    /// Split one category by assignee
    pub fn per_person(&self, category: Category) -> PerPerson {
        let index = index_bugs(&self.bugs);
        let bucket = self.summary.bucket(category);
        let grouped = group_per_person(&bucket.ids, &bucket.lines, &index);
        if grouped.skipped > 0 {
            log::debug!(
                "{} of {} {} bugs had no assignee entry",
                grouped.skipped,
                bucket.len(),
                category
            );
        }
        grouped
    }
}

/// Search and classify the active bugs of `components`
pub async fn report(
    ctx: &ControllerContext,
    components: &[String],
) -> Result<BlockersReport, SyncError> {
    let release = &ctx.config().release;
    let all_releases = triage_query(components, &release.target_releases);
    let current_release = triage_query(
        components,
        std::slice::from_ref(&release.current_target_release),
    );

    let bugs = ctx
        .search(&all_releases)
        .await
        .inspect_err(|e| record_search_failure(ctx, "BugSearchFailed", e))?;

    let summary = summarize_bugs(&release.current_target_release, &bugs);
    let stats = channel_stats(
        &release.current_target_release,
        bugs.len(),
        &summary,
        &all_releases,
        &current_release,
    );

    Ok(BlockersReport {
        channel: blockers_channel_report(&stats),
        summary,
        bugs,
    })
}

pub struct BlockersReporter {
    components: Vec<String>,
}

impl BlockersReporter {
    pub fn new(components: Vec<String>) -> Self {
        Self { components }
    }
}

#[async_trait]
impl Reporter for BlockersReporter {
    fn name(&self) -> &'static str {
        "BlockersReporter"
    }

    async fn sync(&self, ctx: &ControllerContext) -> Result<(), SyncError> {
        let report = report(ctx, &self.components).await?;
        let release = &ctx.config().release.current_target_release;

        let to_triage = report.per_person(Category::ToTriage);
        let blocker_plus = report.per_person(Category::BlockerPlus);
        let urgent = report.per_person(Category::Urgent);

        let mut sent = 0;
        let mut failed = 0;
        for (notice, groups) in [
            (PersonalNotice::Triage, &to_triage),
            (PersonalNotice::BlockerPlus, &blocker_plus),
            (PersonalNotice::Urgent, &urgent),
        ] {
            for (person, message) in person_messages(notice, groups, release) {
                if ctx.notify_email(&person, &message).await {
                    sent += 1;
                } else {
                    failed += 1;
                }
            }
        }
        log::info!("Sent {} personal notifications, {} failed", sent, failed);

        ctx.notify_channel(&report.channel).await;

        if let Some(stats) = admin_debug_stats(&blocker_plus.ids, &to_triage.ids, &urgent.ids) {
            ctx.notify_admin(&stats).await;
        }

        Ok(())
    }
}
