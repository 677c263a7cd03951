//! Session configuration supplied by the caller at session start

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::SessionMetadata;
use crate::settings::ResolverSettings;

/// A tool the agent may call, with templated parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool name.
    pub name: String,

    /// Parameter templates keyed by parameter name.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl ToolConfig {
    /// Creates a tool with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a parameter template.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), template.into());
        self
    }
}

/// Agent definition: the templated text fields plus default variable values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent identifier, used when metadata does not carry one.
    #[serde(default)]
    pub agent_id: String,

    /// System prompt template.
    #[serde(default)]
    pub prompt: String,

    /// First message template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,

    /// Values used for variables the caller does not supply.
    #[serde(default)]
    pub dynamic_variable_defaults: BTreeMap<String, Value>,

    /// Tools with templated parameters.
    #[serde(default)]
    pub tools: Vec<ToolConfig>,
}

impl AgentConfig {
    /// Finds a tool by name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Agent definition.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Caller-supplied variable values; override agent defaults.
    #[serde(default)]
    pub dynamic_variables: BTreeMap<String, Value>,

    /// Call/session metadata feeding the system variables.
    #[serde(default = "default_metadata")]
    pub metadata: SessionMetadata,

    /// Resolver settings.
    #[serde(default)]
    pub settings: ResolverSettings,
}

fn default_metadata() -> SessionMetadata {
    SessionMetadata::new("")
}

impl SessionConfig {
    /// Creates a config for `agent` with no caller variables.
    #[must_use]
    pub fn new(agent: AgentConfig) -> Self {
        Self {
            agent,
            dynamic_variables: BTreeMap::new(),
            metadata: default_metadata(),
            settings: ResolverSettings::default(),
        }
    }

    /// Adds a caller-supplied variable.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.dynamic_variables.insert(name.into(), value.into());
        self
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: SessionMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Replaces the resolver settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }
}
