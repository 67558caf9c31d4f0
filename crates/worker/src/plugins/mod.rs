//! Pluggable metric providers and publishers.
//!
//! A [`Metric`] measures objects and reports name/value pairs per object.
//! A [`Publisher`] ships stored usage records somewhere else. Both are
//! registered in a [`PluginRegistry`] under a `module.path:Name` path and
//! resolved by that path when a job runs.

use std::sync::Arc;

use async_trait::async_trait;
use quotas_core::error::CoreError;
use quotas_core::metric_names::{PLUGIN_DATABASE_SIZE_METRIC, PLUGIN_LOG_PUBLISHER};
use quotas_core::usage::{compose_metric_id, MetricSample};
use quotas_db::models::resource_usage::ResourceUsage;
use quotas_db::DbPool;

pub mod database_size;
pub mod log_publisher;
pub mod registry;

pub use database_size::DatabaseSizeMetric;
pub use log_publisher::LogPublisher;
pub use registry::PluginRegistry;

/// A source of resource-usage measurements.
#[async_trait]
pub trait Metric: Send + Sync {
    /// Type of the objects this provider measures, e.g. `database`.
    fn object_type(&self) -> &str;

    /// Base id that measurement names are appended to.
    fn metric_id(&self) -> &str;

    /// Stored metric id for a measurement name.
    fn get_id(&self, name: &str) -> Result<String, CoreError> {
        compose_metric_id(self.metric_id(), name)
    }

    /// Measure every object this provider knows about.
    async fn all(&self) -> anyhow::Result<Vec<MetricSample>>;
}

/// A sink that forwards stored usage records to an external service.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, usages: Vec<ResourceUsage>) -> anyhow::Result<()>;
}

/// Register the plugins shipped with the worker.
pub fn register_builtins(registry: &mut PluginRegistry, pool: DbPool) -> Result<(), CoreError> {
    registry.register_metric(
        PLUGIN_DATABASE_SIZE_METRIC,
        Arc::new(DatabaseSizeMetric::new(pool)),
    )?;
    registry.register_publisher(PLUGIN_LOG_PUBLISHER, Arc::new(LogPublisher))?;
    Ok(())
}
