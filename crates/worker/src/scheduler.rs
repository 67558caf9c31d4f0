//! Fixed-interval scheduler for quota jobs.
//!
//! Every [`ScheduleEntry`] gets its own background task driven by
//! `tokio::time::interval`. A tick dispatches the entry's job; a failed
//! job is logged and the entry keeps its schedule. All entry tasks exit
//! when the [`CancellationToken`] passed to [`Scheduler::run`] is
//! cancelled.

use std::sync::Arc;

use quotas_core::schedule::ScheduleEntry;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::jobs::{JobContext, JobOutcome};

/// Runs a set of schedule entries against a shared [`JobContext`].
pub struct Scheduler {
    ctx: Arc<JobContext>,
    entries: Vec<ScheduleEntry>,
}

impl Scheduler {
    pub fn new(ctx: Arc<JobContext>, entries: Vec<ScheduleEntry>) -> Self {
        Self { ctx, entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Spawn one loop per entry and wait until all of them have stopped.
    pub async fn run(self, cancel: CancellationToken) {
        if self.entries.is_empty() {
            tracing::warn!("Schedule is empty, no quota jobs will run");
        }

        let tracker = TaskTracker::new();
        for entry in self.entries {
            tracker.spawn(run_entry(Arc::clone(&self.ctx), entry, cancel.clone()));
        }
        tracker.close();
        tracker.wait().await;

        tracing::info!("Scheduler stopped");
    }
}

/// Drive a single entry until cancelled.
async fn run_entry(ctx: Arc<JobContext>, entry: ScheduleEntry, cancel: CancellationToken) {
    tracing::info!(
        entry = %entry.name,
        task = %entry.task,
        plugin = %entry.plugin,
        every_secs = entry.every_secs,
        "Scheduled job started",
    );

    let mut interval = tokio::time::interval(entry.interval());
    // A slow run pushes the next one back instead of bursting to catch up.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(entry = %entry.name, "Scheduled job stopping");
                break;
            }
            _ = interval.tick() => {
                match ctx.dispatch(entry.task, &entry.plugin).await {
                    Ok(JobOutcome::Collected(summary)) => {
                        tracing::debug!(
                            entry = %entry.name,
                            upserts = summary.upserts,
                            "Scheduled collection finished",
                        );
                    }
                    Ok(JobOutcome::Published(published)) => {
                        tracing::debug!(
                            entry = %entry.name,
                            published,
                            "Scheduled publish finished",
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            entry = %entry.name,
                            task = %entry.task,
                            plugin = %entry.plugin,
                            error = %e,
                            "Scheduled job failed",
                        );
                    }
                }
            }
        }
    }
}
