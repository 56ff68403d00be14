//! Config file discovery and the full resolution pipeline

use std::collections::BTreeMap;

use engctl_fs::{NormalizedPath, io};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::context::{ContextStore, MergeConflict, merge_context};
use crate::env::substitute_env_with;
use crate::registry::{PropertyKind, PropertyRegistry};
use crate::validate::validate_properties;
use crate::{Error, Result};

/// File name, without extension, looked up in the working directory.
pub const CONFIG_FILE_STEM: &str = "engctl";

/// Find `engctl.yml`, falling back to `engctl.yaml`, in `dir`.
pub fn find_config_file(dir: &NormalizedPath) -> Option<NormalizedPath> {
    ["yml", "yaml"]
        .iter()
        .map(|ext| dir.join(&format!("{CONFIG_FILE_STEM}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// The effective configuration for one command invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedConfig {
    /// Merged properties, sorted by name
    #[serde(flatten)]
    properties: BTreeMap<String, Value>,

    /// Config file the properties were read from, if any
    #[serde(skip)]
    source: Option<NormalizedPath>,

    /// Context that was merged, if any
    #[serde(skip)]
    context: Option<String>,

    /// Properties set by both the config file and the context
    #[serde(skip)]
    conflicts: Vec<MergeConflict>,
}

impl ResolvedConfig {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// A scalar property rendered as a string.
    ///
    /// Numbers and booleans are accepted so that `ttl: 30` and `ttl: "30"`
    /// read the same.
    pub fn get_string(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Like [`get_string`](Self::get_string) but fails when unset.
    pub fn require_string(&self, name: &str) -> Result<String> {
        self.get_string(name).ok_or_else(|| Error::MissingProperty {
            name: name.to_string(),
        })
    }

    /// A boolean property; `true`/`"true"` count as set.
    pub fn get_bool(&self, name: &str) -> bool {
        match self.properties.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Properties in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn source(&self) -> Option<&NormalizedPath> {
        self.source.as_ref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn conflicts(&self) -> &[MergeConflict] {
        &self.conflicts
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Resolves configuration by merging the config file, a context and CLI
/// overrides.
///
/// Precedence, highest first:
/// 1. CLI overrides
/// 2. Config file (after `${VAR}` substitution and validation)
/// 3. The selected context (explicit name, else the current one)
pub struct ConfigResolver<'a> {
    registry: &'a PropertyRegistry,
    contexts: &'a ContextStore,
    working_dir: Option<NormalizedPath>,
    config_file: Option<NormalizedPath>,
    context_name: Option<String>,
    overrides: BTreeMap<String, Value>,
    env: EnvLookup<'a>,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(registry: &'a PropertyRegistry, contexts: &'a ContextStore) -> Self {
        Self {
            registry,
            contexts,
            working_dir: None,
            config_file: None,
            context_name: None,
            overrides: BTreeMap::new(),
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Directory used for config discovery and relative `--config` paths.
    /// Defaults to the process working directory.
    pub fn working_dir(mut self, dir: NormalizedPath) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Use this config file instead of discovering one. It must exist.
    pub fn config_file(mut self, path: Option<NormalizedPath>) -> Self {
        self.config_file = path;
        self
    }

    /// Merge this context instead of the current one.
    pub fn context(mut self, name: Option<String>) -> Self {
        self.context_name = name;
        self
    }

    /// Set a property that wins over every other source.
    pub fn set_override(mut self, name: impl Into<String>, value: Value) -> Self {
        self.overrides.insert(name.into(), value);
        self
    }

    /// Replace the environment lookup used for `${VAR}` substitution.
    pub fn env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.env = Box::new(lookup);
        self
    }

    /// Run the resolution pipeline.
    pub fn resolve(self) -> Result<ResolvedConfig> {
        let working_dir = match self.working_dir.clone() {
            Some(dir) => dir,
            None => NormalizedPath::current_dir()?,
        };

        let source = match &self.config_file {
            Some(path) => {
                let path = path.resolve_against(&working_dir);
                if !path.is_file() {
                    return Err(Error::ConfigNotFound {
                        path: path.to_native(),
                    });
                }
                Some(path)
            }
            None => find_config_file(&working_dir),
        };

        let mut config = match &source {
            Some(path) => {
                tracing::debug!(path = %path, "Loading config file");
                let mut config = self.load_file(path)?;
                self.resolve_paths(&mut config, path);
                config
            }
            None => {
                tracing::debug!(dir = %working_dir, "No config file found");
                Mapping::new()
            }
        };

        let context = self
            .contexts
            .resolve_name(self.context_name.as_deref())
            .filter(|name| self.contexts.get(name).is_some())
            .map(str::to_string);
        let conflicts = merge_context(&mut config, self.contexts, self.context_name.as_deref());

        for (name, value) in &self.overrides {
            tracing::debug!(property = %name, "Applying command-line override");
            config.insert(Value::String(name.clone()), value.clone());
        }

        let properties = config
            .into_iter()
            .filter_map(|(k, v)| match k {
                Value::String(k) => Some((k, v)),
                _ => None,
            })
            .collect();

        Ok(ResolvedConfig {
            properties,
            source,
            context,
            conflicts,
        })
    }

    /// Parse, substitute and validate one config file.
    fn load_file(&self, path: &NormalizedPath) -> Result<Mapping> {
        let content = io::read_text(path)?;
        let mut document: Value =
            serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                message: e.to_string(),
            })?;

        substitute_env_with(&mut document, &self.env)
            .map_err(|e| Error::in_file(path.to_native(), e))?;

        let config = match document {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::NotAMapping {
                    path: path.to_native(),
                });
            }
        };

        validate_properties(&config, self.registry, path)?;
        Ok(config)
    }

    /// Resolve relative path properties against the config file directory.
    fn resolve_paths(&self, config: &mut Mapping, source: &NormalizedPath) {
        let Some(base) = source.parent() else {
            return;
        };
        let pattern_base = NormalizedPath::new(glob::Pattern::escape(base.as_str()));
        for (name, kind) in self.registry.path_properties() {
            if let Some(Value::String(raw)) = config.get_mut(name) {
                let base = match kind {
                    PropertyKind::Pattern => &pattern_base,
                    _ => &base,
                };
                let resolved = NormalizedPath::new(raw.as_str()).resolve_against(base);
                tracing::debug!(property = name, path = %resolved, "Resolved relative path");
                *raw = resolved.as_str().to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> PropertyRegistry {
        let mut registry = PropertyRegistry::new();
        registry
            .register_value("engine")
            .register_value("ttl")
            .register_path("app")
            .register_pattern("dimensions");
        registry
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_find_config_file_prefers_yml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("engctl.yaml"), "").unwrap();
        let dir = NormalizedPath::new(temp.path());

        assert_eq!(
            find_config_file(&dir).unwrap().file_name(),
            Some("engctl.yaml")
        );

        fs::write(temp.path().join("engctl.yml"), "").unwrap();
        assert_eq!(
            find_config_file(&dir).unwrap().file_name(),
            Some("engctl.yml")
        );
    }

    #[test]
    fn test_resolve_without_config_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = registry();
        let contexts = ContextStore::in_memory();

        let config = ConfigResolver::new(&registry, &contexts)
            .working_dir(NormalizedPath::new(temp.path()))
            .resolve()
            .unwrap();

        assert!(config.is_empty());
        assert!(config.source().is_none());
    }

    #[test]
    fn test_resolve_missing_explicit_config_fails() {
        let temp = TempDir::new().unwrap();
        let registry = registry();
        let contexts = ContextStore::in_memory();

        let err = ConfigResolver::new(&registry, &contexts)
            .working_dir(NormalizedPath::new(temp.path()))
            .config_file(Some(NormalizedPath::new("nope.yml")))
            .resolve()
            .unwrap_err();

        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_resolve_relative_path_properties_against_config_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("project")).unwrap();
        fs::write(
            temp.path().join("project/engctl.yml"),
            "dimensions: ./defs/*.json\nengine: localhost\n",
        )
        .unwrap();
        let registry = registry();
        let contexts = ContextStore::in_memory();

        let config = ConfigResolver::new(&registry, &contexts)
            .working_dir(NormalizedPath::new(temp.path()))
            .config_file(Some(NormalizedPath::new("project/engctl.yml")))
            .env_lookup(no_env)
            .resolve()
            .unwrap();

        let base = NormalizedPath::new(temp.path()).join("project");
        assert_eq!(
            config.get_string("dimensions"),
            Some(base.join("defs/*.json").as_str().to_string())
        );
        assert_eq!(config.get_string("engine"), Some("localhost".to_string()));
    }

    #[test]
    fn test_pattern_properties_escape_the_config_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("team [a]")).unwrap();
        fs::write(
            temp.path().join("team [a]/engctl.yml"),
            "dimensions: defs/*.json\napp: app.json\n",
        )
        .unwrap();
        let registry = registry();
        let contexts = ContextStore::in_memory();

        let config = ConfigResolver::new(&registry, &contexts)
            .working_dir(NormalizedPath::new(temp.path()))
            .config_file(Some(NormalizedPath::new("team [a]/engctl.yml")))
            .env_lookup(no_env)
            .resolve()
            .unwrap();

        let base = NormalizedPath::new(temp.path()).join("team [a]");
        let escaped = NormalizedPath::new(glob::Pattern::escape(base.as_str()));
        assert_eq!(
            config.get_string("dimensions"),
            Some(escaped.join("defs/*.json").as_str().to_string())
        );
        assert_eq!(
            config.get_string("app"),
            Some(base.join("app.json").as_str().to_string())
        );
    }

    #[test]
    fn test_overrides_win_over_config_and_context() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("engctl.yml"), "engine: from-config\n").unwrap();
        let registry = registry();
        let mut contexts = ContextStore::in_memory();
        let ctx: Context = [("engine", Value::from("from-context")), ("ttl", Value::from(60))]
            .into_iter()
            .collect();
        contexts.set("dev", ctx);
        contexts.use_context("dev").unwrap();

        let config = ConfigResolver::new(&registry, &contexts)
            .working_dir(NormalizedPath::new(temp.path()))
            .set_override("ttl", Value::from("5"))
            .resolve()
            .unwrap();

        assert_eq!(config.get_string("engine"), Some("from-config".to_string()));
        assert_eq!(config.get_string("ttl"), Some("5".to_string()));
        assert_eq!(config.context(), Some("dev"));
        assert_eq!(config.conflicts().len(), 1);
        assert_eq!(config.conflicts()[0].property, "engine");
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("engctl.yml"), "- engine\n- ttl\n").unwrap();
        let registry = registry();
        let contexts = ContextStore::in_memory();

        let err = ConfigResolver::new(&registry, &contexts)
            .working_dir(NormalizedPath::new(temp.path()))
            .resolve()
            .unwrap_err();

        assert!(matches!(err, Error::NotAMapping { .. }));
    }

    #[test]
    fn test_get_bool_accepts_string_true() {
        let mut config = ResolvedConfig::default();
        config
            .properties
            .insert("verbose".to_string(), Value::from("TRUE"));
        assert!(config.get_bool("verbose"));
        assert!(!config.get_bool("missing"));
    }
}
