//! In-memory session backend

use serde_json::Value;

use crate::kind::EntityKind;
use crate::session::{Handle, NamedItem, Session, SessionError};

/// A call received by a [`MemorySession`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Create { kind: EntityKind, id: String },
    Update { kind: EntityKind, id: String },
}

#[derive(Debug, Clone)]
struct Stored {
    kind: EntityKind,
    id: String,
    handle: Handle,
    raw: Value,
}

/// Entity store kept entirely in memory.
///
/// Handles are allocated from 1 upwards and never reused. Mutating calls
/// are recorded in a journal.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    entities: Vec<Stored>,
    last_handle: Option<Handle>,
    journal: Vec<SessionCall>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store without journaling.
    ///
    /// Returns the definition back when it has no string `qInfo.qId`, so
    /// the caller decides what an unidentifiable entry means.
    pub fn insert(&mut self, kind: EntityKind, raw: Value) -> Result<Handle, Value> {
        match definition_id(&raw) {
            Some(id) => {
                let id = id.to_string();
                Ok(self.store(kind, id, raw))
            }
            None => Err(raw),
        }
    }

    /// The stored definition of an entity.
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&Value> {
        self.find(kind, id).map(|stored| &stored.raw)
    }

    /// Definitions of one kind in creation order.
    pub fn definitions(&self, kind: EntityKind) -> impl Iterator<Item = &Value> {
        self.entities
            .iter()
            .filter(move |stored| stored.kind == kind)
            .map(|stored| &stored.raw)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Create and update calls received so far.
    pub fn journal(&self) -> &[SessionCall] {
        &self.journal
    }

    fn find(&self, kind: EntityKind, id: &str) -> Option<&Stored> {
        self.entities
            .iter()
            .find(|stored| stored.kind == kind && stored.id == id)
    }

    fn store(&mut self, kind: EntityKind, id: String, raw: Value) -> Handle {
        let handle = Handle::next_after(self.last_handle);
        self.last_handle = Some(handle);
        self.entities.push(Stored {
            kind,
            id,
            handle,
            raw,
        });
        handle
    }
}

impl Session for MemorySession {
    fn lookup(&mut self, kind: EntityKind, id: &str) -> Result<Option<Handle>, SessionError> {
        Ok(self.find(kind, id).map(|stored| stored.handle))
    }

    fn create(&mut self, kind: EntityKind, raw: &Value) -> Result<(), SessionError> {
        let id = definition_id(raw)
            .ok_or_else(|| SessionError::new("definition has no qInfo.qId"))?
            .to_string();
        if self.find(kind, &id).is_some() {
            return Err(SessionError::new(format!("{kind} '{id}' already exists")));
        }
        self.store(kind, id.clone(), raw.clone());
        self.journal.push(SessionCall::Create { kind, id });
        Ok(())
    }

    fn update(
        &mut self,
        kind: EntityKind,
        handle: Handle,
        raw: &Value,
    ) -> Result<(), SessionError> {
        let stored = self
            .entities
            .iter_mut()
            .find(|stored| stored.kind == kind && stored.handle == handle)
            .ok_or_else(|| SessionError::new(format!("no {kind} with handle {}", handle.get())))?;
        stored.raw = raw.clone();
        let id = stored.id.clone();
        self.journal.push(SessionCall::Update { kind, id });
        Ok(())
    }

    fn list(&mut self, kind: EntityKind) -> Result<Vec<NamedItem>, SessionError> {
        Ok(self
            .entities
            .iter()
            .filter(|stored| stored.kind == kind)
            .map(|stored| NamedItem {
                id: stored.id.clone(),
                title: stored
                    .raw
                    .pointer(kind.title_pointer())
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect())
    }
}

fn definition_id(raw: &Value) -> Option<&str> {
    raw.pointer("/qInfo/qId").and_then(Value::as_str)
}
