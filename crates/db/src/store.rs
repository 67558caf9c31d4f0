//! The storage seam used by the quota jobs.
//!
//! Jobs talk to [`UsageStore`] rather than to [`ResourceUsageRepo`]
//! directly so they can run against an in-memory store in tests.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::resource_usage::{ResourceUsage, UpsertResourceUsage};
use crate::repositories::ResourceUsageRepo;

#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Insert or update one usage value by its natural key.
    async fn upsert(&self, usage: &UpsertResourceUsage) -> Result<(), sqlx::Error>;

    /// Fetch one usage record, `None` if nothing is stored for the key.
    async fn get(
        &self,
        object_type: &str,
        object_id: &str,
        metric: &str,
    ) -> Result<Option<ResourceUsage>, sqlx::Error>;
}

#[async_trait]
impl UsageStore for PgPool {
    async fn upsert(&self, usage: &UpsertResourceUsage) -> Result<(), sqlx::Error> {
        let row = ResourceUsageRepo::upsert(self, usage).await?;
        tracing::trace!(
            id = row.id,
            object_type = %row.object_type,
            object_id = %row.object_id,
            metric = %row.metric,
            value = row.value,
            "Resource usage upserted",
        );
        Ok(())
    }

    async fn get(
        &self,
        object_type: &str,
        object_id: &str,
        metric: &str,
    ) -> Result<Option<ResourceUsage>, sqlx::Error> {
        ResourceUsageRepo::get(self, object_type, object_id, metric).await
    }
}
