//! Error types for engctl-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from engctl-config
    #[error(transparent)]
    Config(#[from] engctl_config::Error),

    /// Error from engctl-entities
    #[error(transparent)]
    Entities(#[from] engctl_entities::Error),

    /// Error from engctl-fs
    #[error(transparent)]
    Fs(#[from] engctl_fs::Error),

    /// JSON output error
    #[error("Failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML output error
    #[error("Failed to render YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
