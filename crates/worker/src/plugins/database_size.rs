//! Built-in metric: on-disk size of every Postgres database.

use async_trait::async_trait;
use quotas_core::metric_names::{MEASUREMENT_SIZE_BYTES, METRIC_ID_POSTGRES, OBJECT_TYPE_DATABASE};
use quotas_core::usage::MetricSample;
use quotas_db::DbPool;

use super::Metric;

/// Reports `postgres.size_bytes` for each non-template database visible
/// to the worker's connection pool.
pub struct DatabaseSizeMetric {
    pool: DbPool,
}

impl DatabaseSizeMetric {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Metric for DatabaseSizeMetric {
    fn object_type(&self) -> &str {
        OBJECT_TYPE_DATABASE
    }

    fn metric_id(&self) -> &str {
        METRIC_ID_POSTGRES
    }

    async fn all(&self) -> anyhow::Result<Vec<MetricSample>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT datname::text, pg_database_size(datname) \
             FROM pg_database \
             WHERE NOT datistemplate \
             ORDER BY datname",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, size)| MetricSample::new(name).with(MEASUREMENT_SIZE_BYTES, size))
            .collect())
    }
}
