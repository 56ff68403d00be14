//! The remote capabilities reconciliation relies on

use std::num::NonZeroU64;

use serde::Serialize;
use serde_json::Value;

use crate::kind::EntityKind;

/// Handle of an existing remote entity.
///
/// Remote lookups report "not found" with a zero handle; [`Handle::new`]
/// maps that to `None` so callers never see a zero handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(NonZeroU64);

impl Handle {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// The handle following `previous`, or the first handle.
    pub fn next_after(previous: Option<Handle>) -> Self {
        Self(previous.map_or(NonZeroU64::MIN, |h| h.0.saturating_add(1)))
    }
}

/// Read-only `{id, title}` projection of a remote entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedItem {
    pub id: String,
    pub title: String,
}

/// Failure reported by a session backend.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SessionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SessionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A document session on the analytics engine.
///
/// Every call is blocking: it has taken effect (or failed) when it returns.
/// Implementations do not retry.
pub trait Session {
    /// Find an entity by id.
    fn lookup(&mut self, kind: EntityKind, id: &str) -> Result<Option<Handle>, SessionError>;

    /// Create a new entity from its full definition.
    fn create(&mut self, kind: EntityKind, raw: &Value) -> Result<(), SessionError>;

    /// Replace the properties of an existing entity.
    fn update(&mut self, kind: EntityKind, handle: Handle, raw: &Value)
    -> Result<(), SessionError>;

    /// All entities of a kind.
    fn list(&mut self, kind: EntityKind) -> Result<Vec<NamedItem>, SessionError>;
}
