//! Runtime error types for the loadgate pipeline.
//!
//! Every fallible operation returns `LoadgateResult<T>`. Policy denials are
//! not errors: they surface as a `false` step result with the denied actions
//! reported separately.

use thiserror::Error;

/// The unified error type for the loadgate runtime.
#[derive(Debug, Error)]
pub enum LoadgateError {
    /// A required configuration value is missing or invalid.
    ///
    /// Raised at construction time, before any collaborator exists.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The permission-simulation call itself failed (transport, throttling,
    /// or the caller lacks the right to simulate).
    #[error("permission simulation failed: {reason}")]
    SimulationFailed { reason: String },

    /// An object-storage call failed.
    #[error("object storage call failed: {reason}")]
    StorageFailed { reason: String },

    /// A pipeline step could not be executed at all.
    #[error("pipeline step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    /// The run journal could not be persisted.
    #[error("journal write failed: {reason}")]
    JournalWriteFailed { reason: String },
}

impl LoadgateError {
    /// Shorthand for building a `ConfigError`.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError { reason: reason.into() }
    }
}

/// Convenience alias used throughout the loadgate crates.
pub type LoadgateResult<T> = Result<T, LoadgateError>;
