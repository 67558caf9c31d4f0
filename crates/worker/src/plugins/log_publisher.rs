//! Built-in publisher that writes usage records to the tracing log.
//!
//! Useful as a dry run before wiring a real publisher, and as the default
//! sink in development.

use async_trait::async_trait;
use quotas_db::models::resource_usage::ResourceUsage;

use super::Publisher;

/// Emits one structured `info` event per usage record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, usages: Vec<ResourceUsage>) -> anyhow::Result<()> {
        for usage in &usages {
            tracing::info!(
                object_type = %usage.object_type,
                object_id = %usage.object_id,
                metric = %usage.metric,
                value = usage.value,
                modified = %usage.modified.to_rfc3339(),
                "Resource usage",
            );
        }
        tracing::debug!(count = usages.len(), "Log publisher flushed");
        Ok(())
    }
}
