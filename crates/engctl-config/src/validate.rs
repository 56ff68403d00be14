//! Validation of config file properties against the registry

use std::fmt;

use engctl_fs::NormalizedPath;
use serde_yaml::{Mapping, Value};

use crate::registry::PropertyRegistry;
use crate::{Error, Result};

/// A misspelled property and the registered name it most resembles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub property: String,
    pub suggestion: String,
}

/// Every unrecognized top-level property of one config file.
///
/// Renders as the multi-line diagnostic shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReport {
    pub source: String,
    pub suggestions: Vec<Suggestion>,
    pub unknown: Vec<String>,
}

impl PropertyReport {
    /// Classify each top-level key of `config`.
    ///
    /// Non-string keys are stringified for display and always reported as
    /// unknown, even when the stringified form resembles a real property.
    pub fn check(config: &Mapping, registry: &PropertyRegistry, source: &str) -> Self {
        let mut suggestions = Vec::new();
        let mut unknown = Vec::new();

        for key in config.keys() {
            let Some(name) = key.as_str() else {
                unknown.push(display_key(key));
                continue;
            };
            if registry.is_known(name) {
                continue;
            }
            match registry.suggestion_for(name) {
                Some(suggestion) => suggestions.push(Suggestion {
                    property: name.to_string(),
                    suggestion,
                }),
                None => unknown.push(name.to_string()),
            }
        }

        suggestions.sort_by(|a, b| a.property.cmp(&b.property));
        unknown.sort();

        Self {
            source: source.to_string(),
            suggestions,
            unknown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty() && self.unknown.is_empty()
    }
}

impl fmt::Display for PropertyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "engctl found invalid properties when validating the config file '{}'.",
            self.source
        )?;
        for s in &self.suggestions {
            write!(f, "\n  '{}': did you mean '{}'?", s.property, s.suggestion)?;
        }
        if !self.unknown.is_empty() {
            let prefix = if self.suggestions.is_empty() {
                "M"
            } else {
                "Also, m"
            };
            let quoted: Vec<String> = self.unknown.iter().map(|p| format!("'{p}'")).collect();
            write!(f, "\n{prefix}ysterious properties: {}", quoted.join(", "))?;
        }
        Ok(())
    }
}

/// Fail with a consolidated report if `config` has unrecognized properties.
pub fn validate_properties(
    config: &Mapping,
    registry: &PropertyRegistry,
    source: &NormalizedPath,
) -> Result<()> {
    let report = PropertyReport::check(config, registry, source.as_str());
    if report.is_empty() {
        return Ok(());
    }
    tracing::debug!(
        suggestions = report.suggestions.len(),
        unknown = report.unknown.len(),
        "Config validation failed"
    );
    Err(Error::InvalidProperties { report })
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}
