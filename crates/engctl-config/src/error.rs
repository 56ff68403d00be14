//! Error types for engctl-config

use std::path::PathBuf;

use crate::validate::PropertyReport;

/// Result type for engctl-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Explicitly requested config file does not exist
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Malformed YAML
    #[error("Failed to parse YAML config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Top level of a config document is not a mapping
    #[error("Config file {path} must contain a mapping of properties")]
    NotAMapping { path: PathBuf },

    /// A `${NAME}` reference whose variable is unset or empty
    #[error("environment variable '{name}' not found")]
    MissingEnvVar { name: String },

    /// Unknown or misspelled properties in a config file
    #[error("{report}")]
    InvalidProperties { report: PropertyReport },

    /// A single unknown property outside a config file (contexts, overrides)
    #[error("unknown property '{name}'{}", suggestion_hint(.suggestion))]
    UnknownProperty {
        name: String,
        suggestion: Option<String>,
    },

    /// A required property has no value after resolution
    #[error("property '{name}' is not set; pass it as a flag, in the config file or in a context")]
    MissingProperty { name: String },

    /// Context lookup by name failed
    #[error("context '{name}' does not exist")]
    ContextNotFound { name: String },

    /// Failed to parse the context store
    #[error("Failed to parse context store at {path}: {message}")]
    ContextStoreParse { path: PathBuf, message: String },

    /// Failed to serialize the context store
    #[error("Failed to serialize context store: {0}")]
    ContextStoreSerialize(#[source] serde_yaml::Error),

    /// No platform configuration directory for the context store
    #[error("Could not determine a configuration directory for contexts")]
    NoContextDir,

    /// An error tied to a specific config file
    #[error("in config file {path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Filesystem error from engctl-fs
    #[error(transparent)]
    Fs(#[from] engctl_fs::Error),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(", did you mean '{s}'?"))
        .unwrap_or_default()
}

impl Error {
    pub(crate) fn in_file(path: impl Into<PathBuf>, source: Error) -> Self {
        Self::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
