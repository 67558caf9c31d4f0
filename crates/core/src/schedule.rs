//! Periodic job schedule definitions.
//!
//! A schedule is a list of named entries, each running one task against
//! one plugin on a fixed interval. Entries are loaded from JSON such as:
//!
//! ```json
//! [
//!   {"name": "metrics-db", "task": "collect_metric",
//!    "plugin": "quotas.metrics.postgres:DatabaseSizeMetric", "every_secs": 900},
//!   {"name": "metrics-publisher", "task": "publish_metrics",
//!    "plugin": "quotas.publisher.log:LogPublisher", "every_secs": 900}
//! ]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, PluginKind};
use crate::plugin_path::parse_plugin_path;

/// The jobs a schedule entry can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    CollectMetric,
    PublishMetrics,
}

impl TaskKind {
    /// The kind of plugin this task resolves.
    pub fn plugin_kind(self) -> PluginKind {
        match self {
            TaskKind::CollectMetric => PluginKind::Metric,
            TaskKind::PublishMetrics => PluginKind::Publisher,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::CollectMetric => "collect_metric",
            TaskKind::PublishMetrics => "publish_metrics",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One periodic job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub name: String,
    pub task: TaskKind,
    pub plugin: String,
    pub every_secs: u64,
}

impl ScheduleEntry {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.every_secs)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "schedule entry name must not be empty".into(),
            ));
        }
        if self.every_secs == 0 {
            return Err(CoreError::Validation(format!(
                "schedule entry '{}' must run at least every 1 second",
                self.name
            )));
        }
        parse_plugin_path(&self.plugin).map_err(|e| {
            let reason = match e {
                CoreError::Validation(msg) => msg,
                other => other.to_string(),
            };
            CoreError::Validation(format!("schedule entry '{}': {reason}", self.name))
        })?;
        Ok(())
    }
}

/// Parse and validate a JSON array of schedule entries.
///
/// Entry names must be unique. An empty or whitespace-only input yields an
/// empty schedule.
pub fn parse_schedule(json: &str) -> Result<Vec<ScheduleEntry>, CoreError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let entries: Vec<ScheduleEntry> = serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("invalid schedule: {e}")))?;

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in &entries {
        entry.validate()?;
        if !seen.insert(entry.name.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate schedule entry name '{}'",
                entry.name
            )));
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const VALID: &str = r#"[
        {"name": "metrics-db", "task": "collect_metric",
         "plugin": "quotas.metrics.postgres:DatabaseSizeMetric", "every_secs": 900},
        {"name": "metrics-publisher", "task": "publish_metrics",
         "plugin": "quotas.publisher.log:LogPublisher", "every_secs": 60}
    ]"#;

    #[test]
    fn parses_valid_schedule() {
        let entries = parse_schedule(VALID).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].task, TaskKind::CollectMetric);
        assert_eq!(entries[0].interval(), Duration::from_secs(900));
        assert_eq!(entries[1].task, TaskKind::PublishMetrics);
        assert_eq!(entries[1].plugin, "quotas.publisher.log:LogPublisher");
    }

    #[test]
    fn blank_schedule_is_empty() {
        assert!(parse_schedule("").unwrap().is_empty());
        assert!(parse_schedule("[]").unwrap().is_empty());
    }

    #[test]
    fn unknown_task_rejected() {
        let json = r#"[{"name": "x", "task": "purge", "plugin": "a:B", "every_secs": 1}]"#;
        assert_matches!(parse_schedule(json), Err(CoreError::Validation(_)));
    }

    #[test]
    fn zero_interval_rejected() {
        let json = r#"[{"name": "x", "task": "collect_metric", "plugin": "a:B", "every_secs": 0}]"#;
        let err = parse_schedule(json).unwrap_err();
        assert!(err.to_string().contains("at least every 1 second"), "got: {err}");
    }

    #[test]
    fn malformed_plugin_rejected() {
        let json = r#"[{"name": "x", "task": "collect_metric", "plugin": "nocolon", "every_secs": 5}]"#;
        let err = parse_schedule(json).unwrap_err();
        assert!(err.to_string().contains("schedule entry 'x'"), "got: {err}");
        assert_eq!(err.to_string().matches("Validation failed").count(), 1, "got: {err}");
    }

    #[test]
    fn duplicate_names_rejected() {
        let json = r#"[
            {"name": "x", "task": "collect_metric", "plugin": "a:B", "every_secs": 5},
            {"name": "x", "task": "publish_metrics", "plugin": "a:C", "every_secs": 5}
        ]"#;
        let err = parse_schedule(json).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {err}");
    }

    #[test]
    fn task_kind_maps_to_plugin_kind() {
        assert_eq!(TaskKind::CollectMetric.plugin_kind(), PluginKind::Metric);
        assert_eq!(TaskKind::PublishMetrics.plugin_kind(), PluginKind::Publisher);
        assert_eq!(TaskKind::PublishMetrics.to_string(), "publish_metrics");
    }
}
