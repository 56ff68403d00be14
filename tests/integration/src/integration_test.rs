//! End-to-end integration tests across the workspace crates
//!
//! These tests exercise the complete flow: config file and context
//! resolution -> definition file expansion -> reconciliation against an app.

use engctl_config::{ConfigResolver, Context, ContextStore, PropertyRegistry};
use engctl_entities::{
    EntityKind, MemorySession, Outcome, SessionCall, SnapshotSession, list_entities, set_entities,
};
use engctl_fs::NormalizedPath;
use engctl_test_utils::{Workspace, definitions};
use pretty_assertions::assert_eq;
use serde_yaml::Value;

fn registry() -> PropertyRegistry {
    let mut registry = PropertyRegistry::new();
    registry
        .register_value("engine")
        .register_path("app")
        .register_value("ttl")
        .register_pattern("dimensions")
        .register_pattern("measures");
    registry
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_config_patterns_drive_reconciliation() {
    let ws = Workspace::new();
    ws.write_config(
        "app: build/app.json\ndimensions: defs/dims/*.json\nmeasures: defs/measures/*.yml\n",
    );
    ws.write("defs/dims/region.json", &definitions::dimension("region", "Region"));
    ws.write(
        "defs/measures/sales.yml",
        "qInfo:\n  qId: sales\n  qType: measure\nqMeasure:\n  qDef: Sum(Sales)\n  title: Sales\n",
    );
    let registry = registry();
    let contexts = ContextStore::in_memory();

    let config = ConfigResolver::new(&registry, &contexts)
        .working_dir(NormalizedPath::new(ws.root()))
        .env_lookup(no_env)
        .resolve()
        .unwrap();

    let app = NormalizedPath::new(config.require_string("app").unwrap());
    let mut session = SnapshotSession::open(app.clone()).unwrap();
    for kind in EntityKind::ALL {
        let pattern = config.require_string(kind.plural()).unwrap();
        let report = set_entities(&mut session, kind, &pattern).unwrap();
        assert_eq!(report.created(), 1, "{kind}");
    }
    drop(session);

    let mut reopened = SnapshotSession::open(app).unwrap();
    let measures = list_entities(&mut reopened, EntityKind::Measure).unwrap();
    assert_eq!(measures.len(), 1);
    assert_eq!(measures[0].title, "Sales");
    assert!(ws.path("build/app.json").is_file());
}

#[test]
fn test_context_supplies_app_and_env_supplies_pattern() {
    let ws = Workspace::new();
    ws.write_config("dimensions: ${DIMS_DIR}/*.json\n");
    ws.write("dims/a.json", &definitions::dimension("a", "A"));
    let app_path = ws.path("app.json");
    let registry = registry();
    let mut contexts = ContextStore::in_memory();
    contexts.set(
        "local",
        Context::from_iter([("app", Value::from(app_path.to_string_lossy().as_ref()))]),
    );
    contexts.use_context("local").unwrap();

    let config = ConfigResolver::new(&registry, &contexts)
        .working_dir(NormalizedPath::new(ws.root()))
        .env_lookup(|name| (name == "DIMS_DIR").then(|| "dims".to_string()))
        .resolve()
        .unwrap();

    assert_eq!(config.context(), Some("local"));
    let app = NormalizedPath::new(config.require_string("app").unwrap());
    let mut session = SnapshotSession::open(app).unwrap();
    let report = set_entities(
        &mut session,
        EntityKind::Dimension,
        &config.require_string("dimensions").unwrap(),
    )
    .unwrap();
    assert_eq!(report.applied[0].id, "a");
}

#[test]
fn test_two_files_second_invalid() {
    let ws = Workspace::new();
    ws.write("dims/f1.json", &definitions::dimension("d1", "One"));
    ws.write(
        "dims/f2.json",
        r#"{"qInfo": {"qId": "d2", "qType": "measure"}}"#,
    );
    let pattern = NormalizedPath::new(ws.root()).join("dims/*.json");
    let mut session = MemorySession::new();

    let err = set_entities(&mut session, EntityKind::Dimension, pattern.as_str()).unwrap_err();

    assert_eq!(
        session.journal(),
        &[SessionCall::Create {
            kind: EntityKind::Dimension,
            id: "d1".to_string(),
        }]
    );
    let message = err.to_string();
    assert!(message.contains("f2.json"), "got: {message}");
    assert!(message.contains("dimensions must have qType: dimension"), "got: {message}");
}

#[test]
fn test_existing_app_entities_are_updated_in_place() {
    let ws = Workspace::new();
    ws.write(
        "app.json",
        r#"{"dimensions": [{"qInfo": {"qId": "d1", "qType": "dimension"}, "qDim": {"title": "Old"}}], "measures": []}"#,
    );
    ws.write("dims/d1.json", &definitions::dimension("d1", "New"));
    let mut session = SnapshotSession::open(NormalizedPath::new(ws.path("app.json"))).unwrap();
    let pattern = NormalizedPath::new(ws.root()).join("dims/*.json");

    let report = set_entities(&mut session, EntityKind::Dimension, pattern.as_str()).unwrap();

    assert_eq!(report.applied[0].outcome, Outcome::Updated);
    let items = list_entities(&mut session, EntityKind::Dimension).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "New");
}

#[test]
fn test_patterns_match_under_config_dir_with_glob_characters() {
    let ws = Workspace::new();
    ws.write("team [a]/engctl.yml", "dimensions: dims/*.json\n");
    ws.write("team [a]/dims/region.json", &definitions::dimension("region", "Region"));
    let registry = registry();
    let contexts = ContextStore::in_memory();

    let config = ConfigResolver::new(&registry, &contexts)
        .working_dir(NormalizedPath::new(ws.path("team [a]")))
        .env_lookup(no_env)
        .resolve()
        .unwrap();

    let pattern = config.require_string("dimensions").unwrap();
    let mut session = MemorySession::new();
    let report = set_entities(&mut session, EntityKind::Dimension, &pattern).unwrap();
    assert_eq!(report.created(), 1);
}
