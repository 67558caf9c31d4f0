//! Repository for the `resource_usages` table (one row per natural key).

use sqlx::PgPool;

use crate::models::resource_usage::{ResourceUsage, UpsertResourceUsage};

/// Column list for `resource_usages` SELECT queries.
const COLUMNS: &str = "\
    id, object_type, object_id, metric, value, modified, created_at";

/// Provides query operations for resource usages.
pub struct ResourceUsageRepo;

impl ResourceUsageRepo {
    /// Insert or update the value stored for `(object_type, object_id, metric)`.
    ///
    /// An existing row keeps its `id` and `created_at`; `value` and
    /// `modified` are replaced.
    pub async fn upsert(
        pool: &PgPool,
        usage: &UpsertResourceUsage,
    ) -> Result<ResourceUsage, sqlx::Error> {
        let query = format!(
            "INSERT INTO resource_usages (object_type, object_id, metric, value) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (object_type, object_id, metric) \
             DO UPDATE SET \
                value = EXCLUDED.value, \
                modified = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResourceUsage>(&query)
            .bind(&usage.object_type)
            .bind(&usage.object_id)
            .bind(&usage.metric)
            .bind(usage.value)
            .fetch_one(pool)
            .await
    }

    /// Look up a single usage record by its natural key.
    pub async fn get(
        pool: &PgPool,
        object_type: &str,
        object_id: &str,
        metric: &str,
    ) -> Result<Option<ResourceUsage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resource_usages \
             WHERE object_type = $1 AND object_id = $2 AND metric = $3"
        );
        sqlx::query_as::<_, ResourceUsage>(&query)
            .bind(object_type)
            .bind(object_id)
            .bind(metric)
            .fetch_optional(pool)
            .await
    }
}
