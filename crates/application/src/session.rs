//! A started conversation session
//!
//! Owns the read-only variable registry, the system variable provider and the
//! resolver. Every method takes `&self`, so a session can be shared across
//! concurrent tool invocations behind an `Arc`.

use dynvar_domain::{AgentConfig, DomainResult, VariableSet};

use crate::variable_resolver::{
    FieldKind, ResolutionResult, SystemFrame, SystemVariableProvider, VariableResolver,
};

/// A conversation session with its variables fixed at start.
#[derive(Debug)]
pub struct Session {
    agent: AgentConfig,
    variables: VariableSet,
    system: SystemVariableProvider,
    resolver: VariableResolver,
}

impl Session {
    /// Assembles a session from already validated parts.
    #[must_use]
    pub const fn new(
        agent: AgentConfig,
        variables: VariableSet,
        system: SystemVariableProvider,
        resolver: VariableResolver,
    ) -> Self {
        Self {
            agent,
            variables,
            system,
            resolver,
        }
    }

    /// The agent definition.
    #[must_use]
    pub const fn agent(&self) -> &AgentConfig {
        &self.agent
    }

    /// The user-defined variables.
    #[must_use]
    pub const fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// The system variable provider.
    #[must_use]
    pub const fn system(&self) -> &SystemVariableProvider {
        &self.system
    }

    /// The resolver.
    #[must_use]
    pub const fn resolver(&self) -> &VariableResolver {
        &self.resolver
    }

    /// The conversation identifier.
    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.system.metadata().conversation_id
    }

    /// Resolves `template` for `field`, sampling system values at the field's
    /// cadence.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error under the fail policy.
    pub fn render(&self, field: FieldKind, template: &str) -> DomainResult<ResolutionResult> {
        let frame = self.system.frame(field.cadence());
        self.render_with_frame(field, template, &frame)
    }

    /// Resolves `template` against an already sampled system frame.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error under the fail policy.
    pub fn render_with_frame(
        &self,
        field: FieldKind,
        template: &str,
        frame: &SystemFrame,
    ) -> DomainResult<ResolutionResult> {
        self.resolver
            .resolve_field(field, template, &self.variables, frame)
    }

    /// Previews `template` without applying the fail policy.
    #[must_use]
    pub fn preview(&self, field: FieldKind, template: &str) -> ResolutionResult {
        let frame = self.system.frame(field.cadence());
        self.resolver
            .preview(field, template, &self.variables, &frame)
    }
}
