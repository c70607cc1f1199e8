//! Error types for environments, metadata and the registry

use thiserror::Error;

/// Core error type for environment operations
#[derive(Error, Debug)]
pub enum EnvError {
    /// A lifecycle operation the environment does not provide
    #[error("Operation not implemented by this environment: {0}")]
    Unimplemented(&'static str),

    /// No registry entry under the requested name
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// Registry entry exists but has no `generate` factory
    #[error("Environment {0} does not provide a generate factory")]
    MissingGenerator(String),

    /// Operation not defined for the given space kind
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Metadata out of range (discount factor, horizon)
    #[error("Invalid environment info: {0}")]
    InvalidInfo(String),

    /// Missing or ill-typed constructor argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for environment operations
pub type Result<T> = std::result::Result<T, EnvError>;
