//! Error types for engctl-entities

use std::path::PathBuf;

use crate::definition::DefinitionError;
use crate::kind::EntityKind;
use crate::session::SessionError;

/// Result type for engctl-entities operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, validating or applying entities
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The glob pattern itself is malformed
    #[error("could not interpret glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// An entity file is not valid JSON/YAML
    #[error("could not parse file {path}: {message}")]
    ParseFile { path: PathBuf, message: String },

    /// A definition failed structural validation
    #[error("validation error in file {path}: {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: DefinitionError,
    },

    /// The existence check failed
    #[error("could not look up {kind} {id}: {source}")]
    Lookup {
        kind: EntityKind,
        id: String,
        #[source]
        source: SessionError,
    },

    /// Creating a missing entity failed
    #[error("could not create {kind} with {id}: {source}")]
    Create {
        kind: EntityKind,
        id: String,
        #[source]
        source: SessionError,
    },

    /// Updating an existing entity failed
    #[error("could not update {kind} with {id}: {source}")]
    Update {
        kind: EntityKind,
        id: String,
        #[source]
        source: SessionError,
    },

    /// Listing entities failed
    #[error("could not list {}: {source}", .kind.plural())]
    List {
        kind: EntityKind,
        #[source]
        source: SessionError,
    },

    /// The snapshot document is not in the expected shape
    #[error("Failed to parse snapshot document at {path}: {message}")]
    SnapshotParse { path: PathBuf, message: String },

    /// Filesystem error from engctl-fs
    #[error(transparent)]
    Fs(#[from] engctl_fs::Error),
}
