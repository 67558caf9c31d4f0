//! Worker configuration loaded from environment variables.

use quotas_core::error::CoreError;
use quotas_core::schedule::{parse_schedule, ScheduleEntry};
use quotas_core::usage::{parse_publish_selectors, PublishSelector};

/// Default connection pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} is invalid: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: CoreError,
    },
}

/// Runtime configuration of the quota worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Connection pool size (default: `5`).
    pub max_connections: u32,
    /// Periodic jobs to run.
    pub schedule: Vec<ScheduleEntry>,
    /// Stored records forwarded by `publish_metrics`.
    pub publish_selectors: Vec<PublishSelector>,
}

impl WorkerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `DATABASE_URL`           | --      |
    /// | `DB_MAX_CONNECTIONS`     | `5`     |
    /// | `QUOTAS_SCHEDULE`        | `[]`    |
    /// | `QUOTAS_PUBLISH_METRICS` | `[]`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "DB_MAX_CONNECTIONS",
                        value,
                    })
                }
            },
        };

        let schedule = parse_schedule(&lookup("QUOTAS_SCHEDULE").unwrap_or_default())
            .map_err(|source| ConfigError::Invalid {
                var: "QUOTAS_SCHEDULE",
                source,
            })?;

        let publish_selectors =
            parse_publish_selectors(&lookup("QUOTAS_PUBLISH_METRICS").unwrap_or_default())
                .map_err(|source| ConfigError::Invalid {
                    var: "QUOTAS_PUBLISH_METRICS",
                    source,
                })?;

        Ok(Self {
            database_url,
            max_connections,
            schedule,
            publish_selectors,
        })
    }
}
