//! Path-keyed registry of metric providers and publishers.

use std::collections::HashMap;
use std::sync::Arc;

use quotas_core::error::{CoreError, PluginKind};
use quotas_core::plugin_path::parse_plugin_path;

use super::{Metric, Publisher};

/// A registered plugin of either kind.
#[derive(Clone)]
enum Plugin {
    Metric(Arc<dyn Metric>),
    Publisher(Arc<dyn Publisher>),
}

impl Plugin {
    fn kind(&self) -> PluginKind {
        match self {
            Plugin::Metric(_) => PluginKind::Metric,
            Plugin::Publisher(_) => PluginKind::Publisher,
        }
    }
}

/// Maps plugin paths to plugin instances.
///
/// Built once at startup and shared read-only between jobs.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<String, Plugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric provider under `path`.
    ///
    /// Fails if `path` is not of the form `module.path:Name`.
    pub fn register_metric(
        &mut self,
        path: &str,
        metric: Arc<dyn Metric>,
    ) -> Result<(), CoreError> {
        self.insert(path, Plugin::Metric(metric))
    }

    /// Register a publisher under `path`.
    ///
    /// Fails if `path` is not of the form `module.path:Name`.
    pub fn register_publisher(
        &mut self,
        path: &str,
        publisher: Arc<dyn Publisher>,
    ) -> Result<(), CoreError> {
        self.insert(path, Plugin::Publisher(publisher))
    }

    fn insert(&mut self, path: &str, plugin: Plugin) -> Result<(), CoreError> {
        parse_plugin_path(path)?;
        let kind = plugin.kind();
        if let Some(previous) = self.plugins.insert(path.to_string(), plugin) {
            tracing::warn!(
                plugin = path,
                previous_kind = %previous.kind(),
                kind = %kind,
                "Plugin path registered twice, replacing previous entry",
            );
        } else {
            tracing::debug!(plugin = path, kind = %kind, "Plugin registered");
        }
        Ok(())
    }

    /// Resolve a metric provider by path.
    ///
    /// Unknown paths, malformed paths and paths registered as a publisher
    /// all fail with [`CoreError::InvalidPlugin`].
    pub fn resolve_metric(&self, path: &str) -> Result<Arc<dyn Metric>, CoreError> {
        match self.plugins.get(path) {
            Some(Plugin::Metric(metric)) => Ok(Arc::clone(metric)),
            _ => Err(CoreError::invalid_plugin(PluginKind::Metric, path)),
        }
    }

    /// Resolve a publisher by path.
    ///
    /// Unknown paths, malformed paths and paths registered as a metric all
    /// fail with [`CoreError::InvalidPlugin`].
    pub fn resolve_publisher(&self, path: &str) -> Result<Arc<dyn Publisher>, CoreError> {
        match self.plugins.get(path) {
            Some(Plugin::Publisher(publisher)) => Ok(Arc::clone(publisher)),
            _ => Err(CoreError::invalid_plugin(PluginKind::Publisher, path)),
        }
    }

    /// Kind of the plugin registered under `path`, if any.
    pub fn kind_of(&self, path: &str) -> Option<PluginKind> {
        self.plugins.get(path).map(Plugin::kind)
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
