//! Variable substitution engine
//!
//! Resolves `{{variable}}` placeholders against the system namespace first and
//! the session's user variables second.

use dynvar_domain::{
    DomainError, DomainResult, OnUnresolved, ResolvedVariable, ResolverSettings, VariableOrigin,
    VariableSet,
};
use serde::Serialize;

use super::parser::{Placeholder, extract_variable_names, scan};
use super::system::{Cadence, SystemFrame};

/// The kind of text field being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// The agent's system prompt.
    SystemPrompt,
    /// The agent's first message.
    FirstMessage,
    /// A tool parameter, resolved at invocation time.
    ToolParameter,
}

impl FieldKind {
    /// Returns the cadence at which system values are read for this field.
    #[must_use]
    pub const fn cadence(self) -> Cadence {
        match self {
            Self::SystemPrompt | Self::FirstMessage => Cadence::Snapshot,
            Self::ToolParameter => Cadence::Live,
        }
    }

    /// Returns true if `secret__` variables may be substituted here.
    #[must_use]
    pub const fn allows_secrets(self) -> bool {
        matches!(self, Self::ToolParameter)
    }

    /// Returns a stable name for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SystemPrompt => "system_prompt",
            Self::FirstMessage => "first_message",
            Self::ToolParameter => "tool_parameter",
        }
    }
}

/// A placeholder left unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPlaceholder {
    /// The variable name as written (trimmed).
    pub name: String,
    /// Byte offset of the placeholder in the template.
    pub offset: usize,
    /// True if the name is a secret blocked from this field.
    pub secret: bool,
}

impl UnresolvedPlaceholder {
    /// Converts this placeholder into the error reported under the fail policy.
    #[must_use]
    pub fn to_error(&self) -> DomainError {
        if self.secret {
            DomainError::SecretInPrompt {
                name: self.name.clone(),
                offset: self.offset,
            }
        } else {
            DomainError::UndefinedVariable {
                name: self.name.clone(),
                offset: Some(self.offset),
            }
        }
    }
}

/// Result of variable resolution for a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// The resolved string with all resolvable placeholders substituted.
    pub resolved: String,

    /// Variables that were successfully resolved, in order of appearance.
    pub resolved_variables: Vec<ResolvedVariable>,

    /// Placeholders that could not be resolved (passthrough only).
    pub unresolved: Vec<UnresolvedPlaceholder>,

    /// Whether all placeholders were resolved.
    pub is_complete: bool,
}

impl ResolutionResult {
    /// Creates a result for input with no placeholders.
    #[must_use]
    pub fn no_variables(input: &str) -> Self {
        Self {
            resolved: input.to_string(),
            resolved_variables: Vec::new(),
            unresolved: Vec::new(),
            is_complete: true,
        }
    }

    /// Returns the count of resolved placeholders.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved_variables.len()
    }

    /// Returns the count of unresolved placeholders.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }

    /// Returns the names of unresolved placeholders, in order of appearance.
    #[must_use]
    pub fn unresolved_names(&self) -> Vec<&str> {
        self.unresolved.iter().map(|u| u.name.as_str()).collect()
    }
}

/// The variable resolution engine.
///
/// Stateless apart from its settings, so one resolver can serve concurrent
/// callers through `&self`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariableResolver {
    settings: ResolverSettings,
}

enum Lookup {
    Found(ResolvedVariable),
    Missing,
    SecretBlocked,
}

impl VariableResolver {
    /// Creates a new resolver with the given settings.
    #[must_use]
    pub const fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Returns the current settings.
    #[must_use]
    pub const fn settings(&self) -> ResolverSettings {
        self.settings
    }

    /// Resolves `template` as a tool parameter.
    ///
    /// # Errors
    ///
    /// Under [`OnUnresolved::Fail`], returns
    /// [`DomainError::UndefinedVariable`] for the first placeholder that names
    /// no known variable.
    pub fn resolve(
        &self,
        template: &str,
        registry: &VariableSet,
        system: &SystemFrame,
    ) -> DomainResult<ResolutionResult> {
        self.resolve_field(FieldKind::ToolParameter, template, registry, system)
    }

    /// Resolves `template` for a specific field kind.
    ///
    /// # Errors
    ///
    /// Under [`OnUnresolved::Fail`], returns the error for the first
    /// unresolved placeholder: [`DomainError::UndefinedVariable`], or
    /// [`DomainError::SecretInPrompt`] when a prompt-level field references a
    /// secret.
    pub fn resolve_field(
        &self,
        field: FieldKind,
        template: &str,
        registry: &VariableSet,
        system: &SystemFrame,
    ) -> DomainResult<ResolutionResult> {
        let result = substitute(field, template, registry, system);

        match self.settings.on_unresolved {
            OnUnresolved::Fail => {
                if let Some(first) = result.unresolved.first() {
                    tracing::debug!(
                        field = field.as_str(),
                        name = %first.name,
                        offset = first.offset,
                        "placeholder could not be resolved"
                    );
                    return Err(first.to_error());
                }
            }
            OnUnresolved::Passthrough => {
                if !result.is_complete {
                    tracing::warn!(
                        field = field.as_str(),
                        unresolved = ?result.unresolved_names(),
                        "leaving unresolved placeholders in place"
                    );
                }
            }
        }

        tracing::debug!(
            field = field.as_str(),
            placeholders = result.resolved_count() + result.unresolved_count(),
            "resolved template"
        );
        Ok(result)
    }

    /// Previews resolution, always passing unresolved placeholders through.
    /// Useful for showing a preview in a UI regardless of the policy.
    #[must_use]
    pub fn preview(
        &self,
        field: FieldKind,
        template: &str,
        registry: &VariableSet,
        system: &SystemFrame,
    ) -> ResolutionResult {
        substitute(field, template, registry, system)
    }

    /// Returns the names of placeholders that would be unresolved.
    /// Useful for validating templates before a session goes live.
    #[must_use]
    pub fn find_unresolved(
        &self,
        field: FieldKind,
        template: &str,
        registry: &VariableSet,
        system: &SystemFrame,
    ) -> Vec<String> {
        substitute(field, template, registry, system)
            .unresolved
            .into_iter()
            .map(|u| u.name)
            .collect()
    }

    /// Extracts all placeholder names from the input without resolving them.
    #[must_use]
    pub fn extract_variable_names(template: &str) -> Vec<String> {
        extract_variable_names(template)
    }
}

fn substitute(
    field: FieldKind,
    template: &str,
    registry: &VariableSet,
    system: &SystemFrame,
) -> ResolutionResult {
    let mut placeholders = scan(template).peekable();
    if placeholders.peek().is_none() {
        return ResolutionResult::no_variables(template);
    }

    let mut resolved_vars = Vec::new();
    let mut unresolved = Vec::new();
    let mut result = String::with_capacity(template.len());
    let mut last_end = 0;

    for placeholder in placeholders {
        // Append text before this placeholder
        result.push_str(&template[last_end..placeholder.span.start]);

        match lookup(field, &placeholder, registry, system) {
            Lookup::Found(resolved) => {
                result.push_str(&resolved.value);
                resolved_vars.push(resolved);
            }
            miss => {
                // Keep the original {{variable}} text
                result.push_str(&template[placeholder.span.clone()]);
                unresolved.push(UnresolvedPlaceholder {
                    name: placeholder.name.to_string(),
                    offset: placeholder.offset(),
                    secret: matches!(miss, Lookup::SecretBlocked),
                });
            }
        }

        last_end = placeholder.span.end;
    }

    // Append remaining text after last placeholder
    result.push_str(&template[last_end..]);

    let is_complete = unresolved.is_empty();
    ResolutionResult {
        resolved: result,
        resolved_variables: resolved_vars,
        unresolved,
        is_complete,
    }
}

fn lookup(
    field: FieldKind,
    placeholder: &Placeholder<'_>,
    registry: &VariableSet,
    system: &SystemFrame,
) -> Lookup {
    let name = placeholder.name;

    // 1. Reserved system namespace
    if let Some(value) = system.lookup(name) {
        return Lookup::Found(ResolvedVariable::new(
            name,
            value.render(),
            VariableOrigin::System,
        ));
    }
    if placeholder.is_system() {
        return Lookup::Missing;
    }

    // 2. User-defined variables
    match registry.variable(name) {
        Some(var) if var.is_secret() && !field.allows_secrets() => Lookup::SecretBlocked,
        Some(var) => Lookup::Found(ResolvedVariable::new(
            name,
            var.value.render(),
            VariableOrigin::User,
        )),
        None => Lookup::Missing,
    }
}
