//! Session configuration loading from JSON or YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use dynvar_domain::{DomainError, SessionConfig};

use crate::serialization::{SerializationError, from_json};

/// Errors raised while loading a session configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for a session config.
    #[error(transparent)]
    Json(#[from] SerializationError),

    /// The file is not valid YAML for a session config.
    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A variable value cannot be carried into the session.
    #[error("invalid variable in config: {0}")]
    InvalidVariable(#[from] DomainError),

    /// The extension does not name a supported format.
    #[error("unsupported config format for {}: expected .json, .yaml or .yml", .0.display())]
    UnsupportedExtension(PathBuf),
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from a file extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parses a session configuration from text in the given format.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the text does not describe a session config.
pub fn parse_session_config(
    contents: &str,
    format: ConfigFormat,
) -> Result<SessionConfig, ConfigError> {
    match format {
        ConfigFormat::Json => Ok(from_json(contents)?),
        ConfigFormat::Yaml => {
            let document: serde_yaml::Value = serde_yaml::from_str(contents)?;
            reject_non_finite_variables(&document)?;
            Ok(serde_yaml::from_value(document)?)
        }
    }
}

/// YAML `.inf` and `.nan` would otherwise reach the session as JSON `null`.
fn reject_non_finite_variables(document: &serde_yaml::Value) -> Result<(), ConfigError> {
    let sections = [
        document.get("dynamic_variables"),
        document
            .get("agent")
            .and_then(|agent| agent.get("dynamic_variable_defaults")),
    ];

    let mappings = sections
        .into_iter()
        .flatten()
        .filter_map(serde_yaml::Value::as_mapping);

    for mapping in mappings {
        for (name, value) in mapping {
            if value.as_f64().is_some_and(|f| !f.is_finite()) {
                return Err(DomainError::UnsupportedType {
                    name: name.as_str().unwrap_or_default().to_string(),
                    found: "non-finite number".to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Loads a session configuration file, choosing the format by extension.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the extension is unknown, the file cannot be
/// read, or its contents do not parse.
pub fn load_session_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedExtension(path.to_path_buf()))?;

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?format, "loading session config");
    parse_session_config(&contents, format)
}
