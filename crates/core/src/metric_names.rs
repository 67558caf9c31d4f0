//! Well-known object types, metric ids and plugin paths.
//!
//! These are the canonical names stored in the `resource_usages` table by
//! the built-in plugins and referenced from `QUOTAS_SCHEDULE` /
//! `QUOTAS_PUBLISH_METRICS` configuration.

/// Object type for per-database measurements.
pub const OBJECT_TYPE_DATABASE: &str = "database";

/// Base metric id of the Postgres database-size provider.
pub const METRIC_ID_POSTGRES: &str = "postgres";

/// Measurement name for on-disk size in bytes.
pub const MEASUREMENT_SIZE_BYTES: &str = "size_bytes";

/// Registry path of the built-in Postgres database-size metric.
pub const PLUGIN_DATABASE_SIZE_METRIC: &str = "quotas.metrics.postgres:DatabaseSizeMetric";

/// Registry path of the built-in tracing publisher.
pub const PLUGIN_LOG_PUBLISHER: &str = "quotas.publisher.log:LogPublisher";
