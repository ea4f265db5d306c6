//! Interval scheduling of the reporters
//!
//! Every reporter runs in its own tokio task on a fixed interval until the
//! shared cancellation token fires. A failed cycle is logged and the next
//! one runs on schedule.

use bz_config::{OperatorConfig, ReporterSchedule};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::context::ControllerContext;
use crate::error::SyncError;
use crate::recorder::LogRecorder;
use crate::reporters::{BlockersReporter, EscalationReporter, NewBugReporter, Reporter};

/// A reporter with the interval it runs at
pub struct Scheduled {
    pub reporter: Arc<dyn Reporter>,
    pub interval: Duration,
}

fn interval_of(schedule: &Option<ReporterSchedule>) -> Option<Duration> {
    schedule
        .as_ref()
        .filter(|s| s.enabled)
        .map(|s| Duration::from_secs(s.interval_secs.max(1)))
}

/// Reporters enabled in the `[schedules]` section
pub fn scheduled_reporters(config: &OperatorConfig) -> Vec<Scheduled> {
    let components = &config.schedules.components;
    let mut scheduled = Vec::new();

    if let Some(interval) = interval_of(&config.schedules.new_bugs) {
        scheduled.push(Scheduled {
            reporter: Arc::new(NewBugReporter::new(components.clone())),
            interval,
        });
    }
    if let Some(interval) = interval_of(&config.schedules.blockers) {
        scheduled.push(Scheduled {
            reporter: Arc::new(BlockersReporter::new(components.clone())),
            interval,
        });
    }
    if let Some(interval) = interval_of(&config.schedules.escalation) {
        scheduled.push(Scheduled {
            reporter: Arc::new(EscalationReporter::new(components.clone())),
            interval,
        });
    }

    scheduled
}

/// Run `reporter` every `interval`, the first cycle immediately
pub async fn run_reporter(
    ctx: ControllerContext,
    reporter: Arc<dyn Reporter>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ctx.cancel_token().cancelled() => break,
            _ = ticker.tick() => {}
        }

        match reporter.sync(&ctx).await {
            Ok(()) => log::info!("{} cycle finished", reporter.name()),
            Err(SyncError::Cancelled) => break,
            Err(e) => log::error!("{} cycle failed ({}): {}", reporter.name(), e.reason(), e),
        }
    }

    log::info!("{} stopped", reporter.name());
}

/// Run all `scheduled` reporters until `ctx` is cancelled
pub async fn run(ctx: ControllerContext, scheduled: Vec<Scheduled>) {
    if scheduled.is_empty() {
        log::warn!("No reporters scheduled, nothing to do");
        return;
    }

    let mut tasks = JoinSet::new();
    for Scheduled { reporter, interval } in scheduled {
        log::info!("Scheduling {} every {:?}", reporter.name(), interval);
        let ctx = ctx
            .clone()
            .with_recorder(Arc::new(LogRecorder::new(reporter.name())));
        tasks.spawn(run_reporter(ctx, reporter, interval));
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            log::error!("Reporter task ended abnormally: {}", e);
        }
    }
}
