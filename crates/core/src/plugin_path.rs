//! Plugin path syntax.
//!
//! Plugins are registered and scheduled under a path of the form
//! `module.path:Name`. The module part is a dot-separated list of
//! identifiers; the name is a single identifier.

use crate::error::CoreError;

/// Separator between the module part and the plugin name.
const NAME_SEPARATOR: char = ':';

/// A parsed plugin path, borrowing from the original string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginPath<'a> {
    pub module: &'a str,
    pub name: &'a str,
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split and validate a plugin path.
pub fn parse_plugin_path(path: &str) -> Result<PluginPath<'_>, CoreError> {
    let (module, name) = path.split_once(NAME_SEPARATOR).ok_or_else(|| {
        CoreError::Validation(format!(
            "plugin path '{path}' must have the form 'module.path:Name'"
        ))
    })?;

    if module.is_empty() || !module.split('.').all(is_identifier) {
        return Err(CoreError::Validation(format!(
            "plugin path '{path}' has an invalid module part"
        )));
    }

    if !is_identifier(name) {
        return Err(CoreError::Validation(format!(
            "plugin path '{path}' has an invalid name"
        )));
    }

    Ok(PluginPath { module, name })
}
