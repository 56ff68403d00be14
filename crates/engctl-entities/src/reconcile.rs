//! Create-or-update reconciliation of definitions against a session

use engctl_fs::NormalizedPath;
use serde::Serialize;

use crate::definition::EntityDefinition;
use crate::files::{parse_entity_file, resolve_paths};
use crate::kind::EntityKind;
use crate::session::{NamedItem, Session};
use crate::{Error, Result};

/// What reconciliation did for one definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Created,
    Updated,
}

/// One applied definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub id: String,
    pub outcome: Outcome,
    pub file: String,
}

/// Everything a [`set_entities`] run applied, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub kind: EntityKind,
    pub files: usize,
    pub applied: Vec<Applied>,
}

impl ReconcileReport {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            files: 0,
            applied: Vec::new(),
        }
    }

    pub fn created(&self) -> usize {
        self.count(Outcome::Created)
    }

    pub fn updated(&self) -> usize {
        self.count(Outcome::Updated)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.applied.iter().filter(|a| a.outcome == outcome).count()
    }
}

/// Applies validated definitions of one kind to a session.
pub struct Reconciler<'s, S: Session + ?Sized> {
    session: &'s mut S,
    kind: EntityKind,
}

impl<'s, S: Session + ?Sized> Reconciler<'s, S> {
    pub fn new(session: &'s mut S, kind: EntityKind) -> Self {
        Self { session, kind }
    }

    /// Update the entity if the session knows its id, create it otherwise.
    ///
    /// Exactly one of create or update is called. Errors are not retried.
    pub fn apply(&mut self, definition: &EntityDefinition) -> Result<Outcome> {
        let kind = self.kind;
        let id = definition.id();

        let existing = self.session.lookup(kind, id).map_err(|source| Error::Lookup {
            kind,
            id: id.to_string(),
            source,
        })?;

        match existing {
            Some(handle) => {
                tracing::debug!("Updating {} {}", kind, id);
                self.session
                    .update(kind, handle, definition.raw())
                    .map_err(|source| Error::Update {
                        kind,
                        id: id.to_string(),
                        source,
                    })?;
                Ok(Outcome::Updated)
            }
            None => {
                tracing::debug!("Creating {} {}", kind, id);
                self.session
                    .create(kind, definition.raw())
                    .map_err(|source| Error::Create {
                        kind,
                        id: id.to_string(),
                        source,
                    })?;
                Ok(Outcome::Created)
            }
        }
    }
}

/// Apply every definition matched by `pattern`.
///
/// Files are processed in match order and definitions in file order. Each
/// definition is validated immediately before it is applied, and the first
/// error of any kind aborts the run; definitions applied before it stay
/// applied.
pub fn set_entities<S: Session + ?Sized>(
    session: &mut S,
    kind: EntityKind,
    pattern: &str,
) -> Result<ReconcileReport> {
    let paths = resolve_paths(pattern, kind)?;
    let mut report = ReconcileReport::new(kind);
    let mut reconciler = Reconciler::new(session, kind);

    for path in &paths {
        apply_file(&mut reconciler, path, &mut report)?;
        report.files += 1;
    }

    tracing::debug!(
        created = report.created(),
        updated = report.updated(),
        "Applied {}",
        kind.plural()
    );
    Ok(report)
}

fn apply_file<S: Session + ?Sized>(
    reconciler: &mut Reconciler<'_, S>,
    path: &NormalizedPath,
    report: &mut ReconcileReport,
) -> Result<()> {
    let kind = reconciler.kind;
    for raw in parse_entity_file(path)? {
        let definition =
            EntityDefinition::parse(raw, kind).map_err(|source| Error::Validation {
                path: path.to_native(),
                source,
            })?;
        let outcome = reconciler.apply(&definition)?;
        report.applied.push(Applied {
            id: definition.id().to_string(),
            outcome,
            file: path.to_string(),
        });
    }
    Ok(())
}

/// `{id, title}` of every entity of `kind`, sorted by id.
pub fn list_entities<S: Session + ?Sized>(
    session: &mut S,
    kind: EntityKind,
) -> Result<Vec<NamedItem>> {
    let mut items = session
        .list(kind)
        .map_err(|source| Error::List { kind, source })?;
    items.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySession, SessionCall};
    use crate::session::{Handle, SessionError};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn definition(id: &str) -> EntityDefinition {
        EntityDefinition::parse(
            json!({"qInfo": {"qId": id, "qType": "dimension"}}),
            EntityKind::Dimension,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_entity_is_created_once() {
        let mut session = MemorySession::new();

        let outcome = Reconciler::new(&mut session, EntityKind::Dimension)
            .apply(&definition("d1"))
            .unwrap();

        assert_eq!(outcome, Outcome::Created);
        assert_eq!(
            session.journal(),
            &[SessionCall::Create {
                kind: EntityKind::Dimension,
                id: "d1".to_string(),
            }]
        );
    }

    #[test]
    fn test_existing_entity_is_updated_once() {
        let mut session = MemorySession::new();
        session
            .insert(
                EntityKind::Dimension,
                json!({"qInfo": {"qId": "d1", "qType": "dimension"}}),
            )
            .unwrap();

        let outcome = Reconciler::new(&mut session, EntityKind::Dimension)
            .apply(&definition("d1"))
            .unwrap();

        assert_eq!(outcome, Outcome::Updated);
        assert_eq!(
            session.journal(),
            &[SessionCall::Update {
                kind: EntityKind::Dimension,
                id: "d1".to_string(),
            }]
        );
    }

    type SessionResult<T> = std::result::Result<T, SessionError>;

    struct BrokenSession;

    impl Session for BrokenSession {
        fn lookup(&mut self, _: EntityKind, _: &str) -> SessionResult<Option<Handle>> {
            Ok(None)
        }

        fn create(&mut self, _: EntityKind, _: &Value) -> SessionResult<()> {
            Err(SessionError::new("socket closed"))
        }

        fn update(&mut self, _: EntityKind, _: Handle, _: &Value) -> SessionResult<()> {
            Err(SessionError::new("socket closed"))
        }

        fn list(&mut self, _: EntityKind) -> SessionResult<Vec<NamedItem>> {
            Err(SessionError::new("socket closed"))
        }
    }

    #[test]
    fn test_remote_error_is_wrapped_with_kind_and_id() {
        let mut session = BrokenSession;

        let err = Reconciler::new(&mut session, EntityKind::Dimension)
            .apply(&definition("d1"))
            .unwrap_err();

        assert_eq!(err.to_string(), "could not create dimension with d1: socket closed");
    }

    #[test]
    fn test_list_error_is_wrapped() {
        let err = list_entities(&mut BrokenSession, EntityKind::Measure).unwrap_err();
        assert_eq!(err.to_string(), "could not list measures: socket closed");
    }

    #[test]
    fn test_list_is_sorted_by_id() {
        let mut session = MemorySession::new();
        for id in ["m3", "m1", "m2"] {
            session
                .insert(
                    EntityKind::Measure,
                    json!({"qInfo": {"qId": id, "qType": "measure"}}),
                )
                .unwrap();
        }

        let ids: Vec<_> = list_entities(&mut session, EntityKind::Measure)
            .unwrap()
            .into_iter()
            .map(|item| item.id)
            .collect();

        assert_eq!(ids, vec!["m1", "m2", "m3"]);
    }
}
