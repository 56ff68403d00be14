//! Named property profiles ("contexts") and their merge into a config
//!
//! Contexts live in a single YAML document:
//!
//! ```yaml
//! current-context: local
//! contexts:
//!   local:
//!     engine: localhost:9076
//!     ttl: "30"
//! ```

use std::collections::BTreeMap;

use engctl_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::{Error, Result};

/// Environment variable overriding the directory holding `contexts.yml`.
pub const CONTEXT_DIR_ENV: &str = "ENGCTL_CONTEXT_DIR";

const CONTEXT_FILE_NAME: &str = "contexts.yml";

/// A flat mapping from property name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    properties: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    /// Properties in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ContextFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_context: Option<String>,
    #[serde(default)]
    contexts: BTreeMap<String, Context>,
}

/// Persistent collection of contexts plus the "current" pointer.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    path: Option<NormalizedPath>,
    file: ContextFile,
}

impl ContextStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store from `path`. A missing file yields an empty store
    /// that will be created on the first [`save`](Self::save).
    pub fn load(path: NormalizedPath) -> Result<Self> {
        let file = match io::read_text_if_exists(&path)? {
            Some(content) if !content.trim().is_empty() => {
                serde_yaml::from_str(&content).map_err(|e| Error::ContextStoreParse {
                    path: path.to_native(),
                    message: e.to_string(),
                })?
            }
            _ => ContextFile::default(),
        };
        tracing::debug!(path = %path, contexts = file.contexts.len(), "Loaded context store");
        Ok(Self {
            path: Some(path),
            file,
        })
    }

    /// Load the store from its default location.
    ///
    /// `$ENGCTL_CONTEXT_DIR/contexts.yml` when set, otherwise
    /// `<config_dir>/engctl/contexts.yml`.
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?)
    }

    pub fn default_path() -> Result<NormalizedPath> {
        let dir = match std::env::var_os(CONTEXT_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => NormalizedPath::new(std::path::PathBuf::from(dir)),
            None => dirs::config_dir()
                .map(|d| NormalizedPath::new(d.join("engctl")))
                .ok_or(Error::NoContextDir)?,
        };
        Ok(dir.join(CONTEXT_FILE_NAME))
    }

    /// Write the store back to where it was loaded from.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_yaml::to_string(&self.file).map_err(Error::ContextStoreSerialize)?;
        io::write_text(path, &content)?;
        Ok(())
    }

    /// Name of the active context, if any.
    pub fn current(&self) -> Option<&str> {
        self.file.current_context.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.file.contexts.get(name)
    }

    /// Context names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.file.contexts.keys().map(String::as_str)
    }

    /// Create or extend a context. Existing properties with the same name
    /// are replaced.
    pub fn set(&mut self, name: impl Into<String>, properties: Context) {
        let context = self.file.contexts.entry(name.into()).or_default();
        for (k, v) in properties.properties {
            context.properties.insert(k, v);
        }
    }

    /// Make `name` the active context.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if !self.file.contexts.contains_key(name) {
            return Err(Error::ContextNotFound {
                name: name.to_string(),
            });
        }
        self.file.current_context = Some(name.to_string());
        Ok(())
    }

    /// Remove a context. Removing the active one also clears the pointer.
    pub fn remove(&mut self, name: &str) -> Result<Context> {
        let removed = self
            .file
            .contexts
            .remove(name)
            .ok_or_else(|| Error::ContextNotFound {
                name: name.to_string(),
            })?;
        if self.current() == Some(name) {
            self.file.current_context = None;
        }
        Ok(removed)
    }

    /// Unset the active context. Returns the previous one.
    pub fn clear_current(&mut self) -> Option<String> {
        self.file.current_context.take()
    }

    /// Resolve a requested context name; empty or absent means "current".
    pub fn resolve_name<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested.filter(|n| !n.is_empty()).or_else(|| self.current())
    }
}

/// A property defined by both the config file and the merged context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub context: String,
    pub property: String,
}

/// Overlay a context onto `config`.
///
/// Properties the config already defines keep their config value and are
/// reported as conflicts (and logged as warnings); the rest are copied in.
/// Context properties are applied in sorted key order. An unknown context
/// name, or no name and no current context, is a no-op.
pub fn merge_context(
    config: &mut Mapping,
    store: &ContextStore,
    requested: Option<&str>,
) -> Vec<MergeConflict> {
    let Some(name) = store.resolve_name(requested) else {
        tracing::debug!("No context selected");
        return Vec::new();
    };
    let Some(context) = store.get(name) else {
        tracing::debug!(context = name, "Context not found, skipping merge");
        return Vec::new();
    };

    tracing::debug!(context = name, "Merging config with context");

    let mut conflicts = Vec::new();
    for (property, value) in context.iter() {
        if config.contains_key(property) {
            tracing::warn!(
                "Property '{}' exists in both current context and config, using property from config",
                property
            );
            conflicts.push(MergeConflict {
                context: name.to_string(),
                property: property.to_string(),
            });
        } else {
            config.insert(Value::String(property.to_string()), value.clone());
        }
    }
    conflicts
}
