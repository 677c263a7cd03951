//! Variable naming rules and reserved prefixes

use crate::error::{DomainError, DomainResult};

/// Prefix reserved for platform-computed system variables.
pub const SYSTEM_PREFIX: &str = "system__";

/// Prefix marking user variables that may only reach tool parameters.
pub const SECRET_PREFIX: &str = "secret__";

/// Returns true if `name` lives in the reserved system namespace.
#[must_use]
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with(SYSTEM_PREFIX)
}

/// Returns true if `name` marks a secret variable.
#[must_use]
pub fn is_secret_name(name: &str) -> bool {
    name.starts_with(SECRET_PREFIX)
}

/// Returns true if a placeholder could ever refer to `name`.
///
/// The scanner trims the placeholder body and never accepts braces inside it,
/// so names that are empty, padded with whitespace, or contain braces are
/// unreachable.
#[must_use]
pub fn is_referenceable_name(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && !name.contains(|c: char| c == '{' || c == '}')
}

/// Validates a name supplied for a user-defined variable.
///
/// # Errors
///
/// Returns [`DomainError::ReservedName`] for names under [`SYSTEM_PREFIX`] and
/// [`DomainError::InvalidVariableName`] for names no placeholder can reach.
pub fn validate_user_name(name: &str) -> DomainResult<()> {
    if is_reserved_name(name) {
        return Err(DomainError::ReservedName {
            name: name.to_string(),
        });
    }
    if !is_referenceable_name(name) {
        return Err(DomainError::InvalidVariableName {
            name: name.to_string(),
        });
    }
    Ok(())
}
