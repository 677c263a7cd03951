//! Start session use case

use std::sync::Arc;

use dynvar_domain::{SessionConfig, VariableSet};

use crate::error::ApplicationResult;
use crate::ports::Clock;
use crate::session::Session;
use crate::variable_resolver::{SystemVariableProvider, VariableResolver};

/// Validates a session configuration and starts a session.
///
/// All configuration errors surface here, before any text is rendered.
pub struct StartSession {
    clock: Arc<dyn Clock>,
}

impl StartSession {
    /// Creates the use case with the clock that drives system variables.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Executes the use case.
    ///
    /// Agent defaults are registered first and caller-supplied values layered
    /// on top. The system snapshot is captured here.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`](crate::ApplicationError::Configuration)
    /// if any variable uses the reserved prefix, an unreachable name, or an
    /// unsupported value type.
    pub fn execute(&self, config: SessionConfig) -> ApplicationResult<Session> {
        let SessionConfig {
            agent,
            dynamic_variables,
            mut metadata,
            settings,
        } = config;

        let defaults = VariableSet::from_json_map(&agent.dynamic_variable_defaults)?;
        let supplied = VariableSet::from_json_map(&dynamic_variables)?;
        let variables = defaults.merged_with(supplied);

        if metadata.agent_id.is_empty() {
            metadata.agent_id.clone_from(&agent.agent_id);
        }

        let system = SystemVariableProvider::new(metadata, Arc::clone(&self.clock));

        tracing::info!(
            agent_id = %system.metadata().agent_id,
            conversation_id = %system.metadata().conversation_id,
            variables = variables.len(),
            on_unresolved = settings.on_unresolved.as_str(),
            "session started"
        );

        Ok(Session::new(
            agent,
            variables,
            system,
            VariableResolver::new(settings),
        ))
    }
}
