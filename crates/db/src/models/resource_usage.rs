//! Resource-usage entity model and DTOs.

use quotas_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The latest stored value of one metric for one object.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ResourceUsage {
    pub id: DbId,
    pub object_type: String,
    pub object_id: String,
    pub metric: String,
    pub value: i64,
    pub modified: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for upserting a usage value by its natural key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpsertResourceUsage {
    pub object_type: String,
    pub object_id: String,
    pub metric: String,
    pub value: i64,
}
