//! The two quota jobs: metric collection and metric publishing.
//!
//! Each job resolves its plugin by path, makes a single pass over the
//! data and returns. Nothing is retried or caught here; errors propagate
//! to whoever invoked the job (normally the [`Scheduler`]).
//!
//! [`Scheduler`]: crate::scheduler::Scheduler

use std::sync::Arc;

use quotas_core::error::CoreError;
use quotas_core::schedule::TaskKind;
use quotas_core::usage::PublishSelector;
use quotas_db::models::resource_usage::UpsertResourceUsage;
use quotas_db::UsageStore;

use crate::plugins::PluginRegistry;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Plugin '{path}' failed: {source}")]
    Plugin {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl JobError {
    fn plugin(path: &str, source: anyhow::Error) -> Self {
        JobError::Plugin {
            path: path.to_string(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Counts from one `collect_metric` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectSummary {
    /// Objects reported by the provider.
    pub objects: usize,
    /// Usage records written.
    pub upserts: usize,
}

/// Result of dispatching a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Collected(CollectSummary),
    /// Number of usage records handed to the publisher.
    Published(usize),
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// Collect every measurement of the metric provider registered at `path`
/// and upsert one usage record per (object, measurement) pair.
pub async fn collect_metric(
    registry: &PluginRegistry,
    store: &dyn UsageStore,
    path: &str,
) -> Result<CollectSummary, JobError> {
    let metric = registry.resolve_metric(path)?;

    let samples = metric
        .all()
        .await
        .map_err(|e| JobError::plugin(path, e))?;

    let mut summary = CollectSummary::default();
    for sample in samples {
        summary.objects += 1;
        for (name, value) in sample.values {
            let usage = UpsertResourceUsage {
                object_type: metric.object_type().to_string(),
                object_id: sample.object_id.clone(),
                metric: metric.get_id(&name)?,
                value,
            };
            store.upsert(&usage).await?;
            summary.upserts += 1;
        }
    }

    tracing::info!(
        plugin = path,
        objects = summary.objects,
        upserts = summary.upserts,
        "Metric collected",
    );

    Ok(summary)
}

/// Forward the stored usage records named by `selectors` to the publisher
/// registered at `path`.
///
/// Selectors with no stored record are skipped. The publisher is called
/// exactly once with the found records in selector order, even when none
/// were found. Returns the number of records forwarded.
pub async fn publish_metrics(
    registry: &PluginRegistry,
    store: &dyn UsageStore,
    selectors: &[PublishSelector],
    path: &str,
) -> Result<usize, JobError> {
    let publisher = registry.resolve_publisher(path)?;

    let mut usages = Vec::with_capacity(selectors.len());
    for selector in selectors {
        match store
            .get(&selector.object_type, &selector.object_id, &selector.metric)
            .await?
        {
            Some(usage) => usages.push(usage),
            None => {
                tracing::debug!(
                    object_type = %selector.object_type,
                    object_id = %selector.object_id,
                    metric = %selector.metric,
                    "No stored usage for selector, skipping",
                );
            }
        }
    }

    let published = usages.len();
    publisher
        .publish(usages)
        .await
        .map_err(|e| JobError::plugin(path, e))?;

    tracing::info!(
        plugin = path,
        selected = selectors.len(),
        published,
        "Metrics published",
    );

    Ok(published)
}

// ---------------------------------------------------------------------------
// JobContext
// ---------------------------------------------------------------------------

/// Everything a job invocation needs, shared between scheduled tasks.
pub struct JobContext {
    pub registry: PluginRegistry,
    pub store: Arc<dyn UsageStore>,
    pub publish_selectors: Vec<PublishSelector>,
}

impl JobContext {
    pub fn new(
        registry: PluginRegistry,
        store: Arc<dyn UsageStore>,
        publish_selectors: Vec<PublishSelector>,
    ) -> Self {
        Self {
            registry,
            store,
            publish_selectors,
        }
    }

    /// Run one task against the plugin at `plugin`.
    pub async fn dispatch(&self, task: TaskKind, plugin: &str) -> Result<JobOutcome, JobError> {
        match task {
            TaskKind::CollectMetric => {
                collect_metric(&self.registry, self.store.as_ref(), plugin)
                    .await
                    .map(JobOutcome::Collected)
            }
            TaskKind::PublishMetrics => publish_metrics(
                &self.registry,
                self.store.as_ref(),
                &self.publish_selectors,
                plugin,
            )
            .await
            .map(JobOutcome::Published),
        }
    }
}
