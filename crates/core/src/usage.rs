//! Resource-usage domain values shared by providers, storage and publishers.
//!
//! Pure logic -- the worker fills [`MetricSample`]s from providers and
//! turns them into upserts; [`PublishSelector`]s name the stored records
//! forwarded to a publisher.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Separator between a provider's base metric id and a measurement name.
const METRIC_ID_SEPARATOR: char = '.';

/// All measurements a provider reported for a single object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSample {
    pub object_id: String,
    /// Measurement name to value. Ordered so upserts run deterministically.
    pub values: BTreeMap<String, i64>,
}

impl MetricSample {
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style helper for adding a measurement.
    pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
        self.values.insert(name.into(), value);
        self
    }
}

/// Compose the stored metric id for a measurement: `"{base}.{name}"`.
pub fn compose_metric_id(base: &str, name: &str) -> Result<String, CoreError> {
    if base.is_empty() {
        return Err(CoreError::Validation("metric id must not be empty".into()));
    }
    if name.is_empty() {
        return Err(CoreError::Validation(format!(
            "measurement name for metric '{base}' must not be empty"
        )));
    }
    Ok(format!("{base}{METRIC_ID_SEPARATOR}{name}"))
}

/// Identifies one stored usage record to forward to a publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSelector {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(rename = "id")]
    pub object_id: String,
    pub metric: String,
}

impl PublishSelector {
    pub fn new(
        object_type: impl Into<String>,
        object_id: impl Into<String>,
        metric: impl Into<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
            metric: metric.into(),
        }
    }
}

/// Parse a JSON array of publish selectors.
///
/// Only the JSON shape is checked. A selector whose key matches nothing
/// stored (an empty `metric`, say) is accepted here and skipped when the
/// publish job looks it up. An empty or whitespace-only input yields an
/// empty list.
pub fn parse_publish_selectors(json: &str) -> Result<Vec<PublishSelector>, CoreError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("invalid publish selectors: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn compose_joins_with_dot() {
        assert_eq!(
            compose_metric_id("postgres", "size_bytes").unwrap(),
            "postgres.size_bytes"
        );
    }

    #[test]
    fn compose_rejects_empty_parts() {
        assert_matches!(compose_metric_id("", "x"), Err(CoreError::Validation(_)));
        assert_matches!(compose_metric_id("afs", ""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn sample_builder_collects_values() {
        let sample = MetricSample::new("vol-1").with("quota", 10).with("used", 4);
        assert_eq!(sample.object_id, "vol-1");
        assert_eq!(sample.values.len(), 2);
        assert_eq!(sample.values["used"], 4);
    }

    #[test]
    fn selectors_use_short_json_keys() {
        let json = r#"[{"type": "database", "id": "app", "metric": "postgres.size_bytes"}]"#;
        let selectors = parse_publish_selectors(json).unwrap();
        assert_eq!(
            selectors,
            vec![PublishSelector::new("database", "app", "postgres.size_bytes")]
        );
    }

    #[test]
    fn blank_input_is_empty_list() {
        assert!(parse_publish_selectors("").unwrap().is_empty());
        assert!(parse_publish_selectors("  \n").unwrap().is_empty());
        assert!(parse_publish_selectors("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_rejected() {
        assert_matches!(
            parse_publish_selectors(r#"[{"type": "database"}]"#),
            Err(CoreError::Validation(_))
        );
        assert_matches!(parse_publish_selectors("{"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_fields_accepted() {
        let json = r#"[{"type": "My Object Type", "id": "My Object ID", "metric": ""}]"#;
        let selectors = parse_publish_selectors(json).unwrap();
        assert_eq!(
            selectors,
            vec![PublishSelector::new("My Object Type", "My Object ID", "")]
        );
    }

    #[test]
    fn malformed_json_message_is_not_nested() {
        let err = parse_publish_selectors("[1]").unwrap_err();
        assert_eq!(err.to_string().matches("Validation failed").count(), 1, "got: {err}");
    }
}
