//! Glob expansion and entity file parsing

use engctl_fs::{NormalizedPath, io};
use serde_json::Value;

use crate::kind::EntityKind;
use crate::{Error, Result};

/// Expand `pattern` into matching files, in match order.
///
/// No matches is not an error: it is logged as a warning and an empty list
/// is returned. Matched directories are skipped.
pub fn resolve_paths(pattern: &str, kind: EntityKind) -> Result<Vec<NormalizedPath>> {
    let entries = glob::glob(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            engctl_fs::Error::io(path, e.into_error())
        })?;
        if path.is_file() {
            paths.push(NormalizedPath::new(path));
        }
    }

    if paths.is_empty() {
        tracing::warn!("No {} files matched pattern {}", kind.tag(), pattern);
    } else {
        tracing::debug!(count = paths.len(), pattern, "Resolved {} files", kind.tag());
    }
    Ok(paths)
}

/// Parse one file into raw definitions.
///
/// The file holds either a single definition or a list of them, written as
/// JSON or YAML.
pub fn parse_entity_file(path: &NormalizedPath) -> Result<Vec<Value>> {
    let content = io::read_text(path)?;
    let document: Value = serde_yaml::from_str(&content).map_err(|e| Error::ParseFile {
        path: path.to_native(),
        message: e.to_string(),
    })?;

    match document {
        Value::Array(items) => Ok(items),
        Value::Null => Err(Error::ParseFile {
            path: path.to_native(),
            message: "file contains no definitions".to_string(),
        }),
        single => Ok(vec![single]),
    }
}
