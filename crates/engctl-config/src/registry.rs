//! Registry of recognized configuration properties
//!
//! Each command module registers the properties it reads during startup;
//! the registry is then handed, read-only, to the config validator and the
//! context commands.

use std::collections::BTreeMap;

use crate::suggest::suggest;
use crate::{Error, Result};

/// How a property value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Used as written.
    Value,
    /// A filesystem path; relative values in a config file are resolved
    /// against the directory of that file.
    Path,
    /// A glob over filesystem paths, resolved like [`Path`](Self::Path).
    /// The config file directory is escaped so that its own `[`, `]`, `*`
    /// or `?` match literally.
    Pattern,
}

/// Set of recognized property names.
///
/// Registration is additive. Registering a name twice keeps the last kind.
/// Names are kept sorted, which makes suggestion tie-breaks deterministic.
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    properties: BTreeMap<String, PropertyKind>,
}

impl PropertyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property of the given kind.
    pub fn register(&mut self, name: impl Into<String>, kind: PropertyKind) -> &mut Self {
        self.properties.insert(name.into(), kind);
        self
    }

    /// Register a plain value property.
    pub fn register_value(&mut self, name: impl Into<String>) -> &mut Self {
        self.register(name, PropertyKind::Value)
    }

    /// Register a path property.
    pub fn register_path(&mut self, name: impl Into<String>) -> &mut Self {
        self.register(name, PropertyKind::Path)
    }

    /// Register a glob pattern property.
    pub fn register_pattern(&mut self, name: impl Into<String>) -> &mut Self {
        self.register(name, PropertyKind::Pattern)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<PropertyKind> {
        self.properties.get(name).copied()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Path and pattern properties with their kind, in sorted order.
    pub fn path_properties(&self) -> impl Iterator<Item = (&str, PropertyKind)> {
        self.properties
            .iter()
            .filter(|(_, kind)| **kind != PropertyKind::Value)
            .map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Closest registered name to `name`, if any is close enough.
    pub fn suggestion_for(&self, name: &str) -> Option<String> {
        suggest(name, self.names())
    }

    /// Fail with an [`Error::UnknownProperty`] unless `name` is registered.
    pub fn check(&self, name: &str) -> Result<()> {
        if self.is_known(name) {
            return Ok(());
        }
        Err(Error::UnknownProperty {
            name: name.to_string(),
            suggestion: self.suggestion_for(name),
        })
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
