use std::fmt;

/// The two kinds of plugin a job can resolve by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Metric,
    Publisher,
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginKind::Metric => f.write_str("metric"),
            PluginKind::Publisher => f.write_str("publisher"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid {kind} class: {path}")]
    InvalidPlugin { kind: PluginKind, path: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn invalid_plugin(kind: PluginKind, path: impl Into<String>) -> Self {
        CoreError::InvalidPlugin {
            kind,
            path: path.into(),
        }
    }
}
