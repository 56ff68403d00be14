//! Entity definition files and create-or-update reconciliation for engctl
//!
//! ```text
//! glob pattern
//!     -> files::resolve_paths      (match order)
//!     -> files::parse_entity_file  (one or a list of definitions per file)
//!     -> EntityDefinition::parse   (structural validation, no remote calls)
//!     -> Reconciler::apply         (lookup, then update or create)
//! ```
//!
//! Definitions are applied strictly in order and the first failure stops
//! the batch. Earlier definitions stay applied.

pub mod definition;
pub mod error;
pub mod files;
pub mod kind;
pub mod memory;
pub mod reconcile;
pub mod session;
pub mod snapshot;

pub use definition::{EntityDefinition, EntityInfo};
pub use error::{Error, Result};
pub use kind::EntityKind;
pub use memory::{MemorySession, SessionCall};
pub use reconcile::{Outcome, ReconcileReport, Reconciler, list_entities, set_entities};
pub use session::{Handle, NamedItem, Session, SessionError};
pub use snapshot::SnapshotSession;
