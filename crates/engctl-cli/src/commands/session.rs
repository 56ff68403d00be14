//! Configuration resolution and session opening shared by all commands

use engctl_config::{ConfigResolver, ContextStore, PropertyRegistry, ResolvedConfig};
use engctl_entities::SnapshotSession;
use engctl_fs::NormalizedPath;
use serde_yaml::Value;

use crate::cli::GlobalArgs;
use crate::error::Result;

/// Register the properties describing the engine session.
pub fn register_properties(registry: &mut PropertyRegistry) {
    registry
        .register_value("engine")
        .register_path("app")
        .register_value("ttl")
        .register_value("headers")
        .register_value("verbose");
}

/// Resolve the configuration for this invocation.
///
/// Flags given on the command line become overrides.
pub fn resolve_config(
    global: &GlobalArgs,
    registry: &PropertyRegistry,
    contexts: &ContextStore,
) -> Result<ResolvedConfig> {
    let mut resolver = ConfigResolver::new(registry, contexts)
        .config_file(global.config.as_deref().map(NormalizedPath::new))
        .context(global.context.clone());

    for (name, value) in [
        ("engine", &global.engine),
        ("app", &global.app),
        ("ttl", &global.ttl),
    ] {
        if let Some(value) = value {
            resolver = resolver.set_override(name, Value::from(value.as_str()));
        }
    }
    if global.verbose {
        resolver = resolver.set_override("verbose", Value::Bool(true));
    }

    let config = resolver.resolve()?;
    if let Some(source) = config.source() {
        tracing::debug!(config = %source, "Resolved configuration");
    }
    Ok(config)
}

/// Open the app named by the `app` property.
pub fn open_session(config: &ResolvedConfig) -> Result<SnapshotSession> {
    let app = config.require_string("app")?;
    if let Some(engine) = config.get_string("engine") {
        tracing::debug!(engine = %engine, ttl = ?config.get_string("ttl"), "Engine");
    }
    tracing::debug!(app = %app, "Opening app");
    Ok(SnapshotSession::open(NormalizedPath::new(app))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engctl_test_utils::Workspace;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_config_file() {
        let ws = Workspace::new();
        let config_path = ws.write_config("engine: from-file\nttl: 10\n");
        let registry = crate::commands::property_registry();
        let contexts = ContextStore::in_memory();
        let global = GlobalArgs {
            config: Some(config_path),
            engine: Some("from-flag".to_string()),
            ..GlobalArgs::default()
        };

        let config = resolve_config(&global, &registry, &contexts).unwrap();

        assert_eq!(config.get_string("engine"), Some("from-flag".to_string()));
        assert_eq!(config.get_string("ttl"), Some("10".to_string()));
        assert!(!config.get_bool("verbose"));
    }

    #[test]
    fn test_open_session_requires_app() {
        let err = open_session(&ResolvedConfig::default()).unwrap_err();
        assert!(err.to_string().contains("'app'"));
    }
}
