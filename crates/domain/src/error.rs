//! Domain error types

use thiserror::Error;

/// Errors raised while registering or resolving dynamic variables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A user-defined variable used the reserved system prefix.
    #[error("variable name '{name}' uses the reserved prefix 'system__'")]
    ReservedName {
        /// The rejected name.
        name: String,
    },

    /// A placeholder or lookup named a variable that is not defined.
    #[error("undefined variable '{name}'{}", fmt_offset(*.offset))]
    UndefinedVariable {
        /// The variable name as written in the template (trimmed).
        name: String,
        /// Byte offset of the placeholder in the template, if any.
        offset: Option<usize>,
    },

    /// A value was not a string, number, or boolean.
    #[error("variable '{name}' has unsupported type {found}; expected string, number or boolean")]
    UnsupportedType {
        /// The variable name.
        name: String,
        /// Description of the rejected type.
        found: String,
    },

    /// A variable name can never be referenced by a placeholder.
    #[error("invalid variable name: {name:?}")]
    InvalidVariableName {
        /// The rejected name.
        name: String,
    },

    /// A secret variable was referenced from a prompt-level field.
    #[error("secret variable '{name}' at offset {offset} cannot be used in prompt text")]
    SecretInPrompt {
        /// The secret variable name.
        name: String,
        /// Byte offset of the placeholder in the template.
        offset: usize,
    },
}

fn fmt_offset(offset: Option<usize>) -> String {
    offset.map_or_else(String::new, |at| format!(" at offset {at}"))
}

impl DomainError {
    /// Returns the variable name this error refers to.
    #[must_use]
    pub fn variable_name(&self) -> &str {
        match self {
            Self::ReservedName { name }
            | Self::UndefinedVariable { name, .. }
            | Self::UnsupportedType { name, .. }
            | Self::InvalidVariableName { name }
            | Self::SecretInPrompt { name, .. } => name,
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
