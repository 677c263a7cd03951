//! Resolver settings
//!
//! Controls how the substitution engine treats placeholders it cannot resolve.

use serde::{Deserialize, Serialize};

/// Policy applied to a placeholder that names no known variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnUnresolved {
    /// Abort the substitution with an error (default).
    #[default]
    Fail,
    /// Leave the placeholder text in place, e.g. for UI previews.
    Passthrough,
}

impl OnUnresolved {
    /// Returns the configuration keyword for this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Passthrough => "passthrough",
        }
    }
}

impl std::str::FromStr for OnUnresolved {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!(
                "unknown onUnresolved policy '{other}' (expected 'fail' or 'passthrough')"
            )),
        }
    }
}

/// Settings for a variable resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolverSettings {
    /// What to do with unresolved placeholders.
    #[serde(default)]
    pub on_unresolved: OnUnresolved,
}

impl ResolverSettings {
    /// Settings that fail on the first unresolved placeholder.
    #[must_use]
    pub const fn fail() -> Self {
        Self {
            on_unresolved: OnUnresolved::Fail,
        }
    }

    /// Settings that keep unresolved placeholders verbatim.
    #[must_use]
    pub const fn passthrough() -> Self {
        Self {
            on_unresolved: OnUnresolved::Passthrough,
        }
    }
}
