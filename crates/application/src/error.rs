//! Application error types

use dynvar_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The session configuration was rejected; the session does not start.
    #[error("invalid session configuration: {0}")]
    Configuration(#[from] DomainError),

    /// A template field could not be resolved. The session stays usable and
    /// the call may be retried with corrected variables.
    #[error("failed to resolve {field}: {source}")]
    Resolution {
        /// The field that failed, e.g. `system_prompt` or `tool:lookup.account`.
        field: String,
        /// The underlying resolution error.
        #[source]
        source: DomainError,
    },

    /// The requested tool is not defined by the agent.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl ApplicationError {
    /// Wraps a resolution failure for `field`.
    #[must_use]
    pub fn resolution(field: impl Into<String>, source: DomainError) -> Self {
        Self::Resolution {
            field: field.into(),
            source,
        }
    }

    /// Returns true if the error happened before the session started.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
