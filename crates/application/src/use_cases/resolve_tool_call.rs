//! Resolve tool call use case

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ApplicationError, ApplicationResult};
use crate::session::Session;
use crate::variable_resolver::FieldKind;

/// Tool parameters after substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallOutput {
    /// The tool name.
    pub tool: String,
    /// Resolved parameter values keyed by parameter name.
    pub parameters: BTreeMap<String, String>,
    /// Whether every placeholder was resolved.
    pub is_complete: bool,
    /// All unresolved placeholder names, sorted and deduplicated.
    pub all_unresolved: Vec<String>,
}

/// Resolves the parameters of one tool invocation.
///
/// Each call samples its own live system frame, so concurrent invocations on
/// the same session never share or observe each other's live values.
pub struct ResolveToolCall<'a> {
    session: &'a Session,
}

impl<'a> ResolveToolCall<'a> {
    /// Creates the use case for `session`.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Resolves the parameters of the agent tool named `tool`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::UnknownTool`] if the agent has no such
    /// tool, and [`ApplicationError::Resolution`] under the fail policy.
    pub fn execute(&self, tool: &str) -> ApplicationResult<ToolCallOutput> {
        let config = self
            .session
            .agent()
            .tool(tool)
            .ok_or_else(|| ApplicationError::UnknownTool(tool.to_string()))?;
        self.execute_parameters(&config.name, &config.parameters)
    }

    /// Resolves an ad-hoc set of parameter templates for `tool`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Resolution`] naming the first parameter
    /// that failed under the fail policy.
    pub fn execute_parameters(
        &self,
        tool: &str,
        templates: &BTreeMap<String, String>,
    ) -> ApplicationResult<ToolCallOutput> {
        // One sample per invocation keeps every live value consistent.
        let frame = self.session.system().live_frame();

        let mut parameters = BTreeMap::new();
        let mut all_unresolved = Vec::new();

        for (name, template) in templates {
            let result = self
                .session
                .render_with_frame(FieldKind::ToolParameter, template, &frame)
                .map_err(|e| ApplicationError::resolution(format!("tool:{tool}.{name}"), e))?;

            all_unresolved.extend(result.unresolved.into_iter().map(|u| u.name));
            parameters.insert(name.clone(), result.resolved);
        }

        all_unresolved.sort();
        all_unresolved.dedup();

        tracing::debug!(
            tool,
            parameters = parameters.len(),
            unresolved = all_unresolved.len(),
            "resolved tool parameters"
        );

        Ok(ToolCallOutput {
            tool: tool.to_string(),
            parameters,
            is_complete: all_unresolved.is_empty(),
            all_unresolved,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ports::Clock;
    use crate::use_cases::StartSession;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use dynvar_domain::{
        AgentConfig, DomainError, ResolverSettings, SessionConfig, SessionMetadata, ToolConfig,
    };
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 26, 12, 0, 0).unwrap()
    }

    fn session(clock: Arc<ManualClock>, settings: ResolverSettings) -> Session {
        let agent = AgentConfig {
            agent_id: "agent_123".to_string(),
            tools: vec![
                ToolConfig::new("lookup_account")
                    .with_parameter("account", "{{account_id}}")
                    .with_parameter("auth", "Bearer {{secret__token}}")
                    .with_parameter("elapsed", "{{system__call_duration_secs}}")
                    .with_parameter("at", "{{system__time_utc}}"),
                ToolConfig::new("broken").with_parameter("q", "{{missing}}"),
            ],
            ..AgentConfig::default()
        };
        let config = SessionConfig::new(agent)
            .with_variable("account_id", "acc-42")
            .with_variable("secret__token", "sk-123")
            .with_metadata(SessionMetadata::new("agent_123").with_started_at(t0()))
            .with_settings(settings);
        StartSession::new(clock).execute(config).unwrap()
    }

    #[test]
    fn test_resolves_tool_parameters_with_live_values() {
        let clock = Arc::new(ManualClock(Mutex::new(t0())));
        let session = session(clock.clone(), ResolverSettings::fail());

        *clock.0.lock().unwrap() = t0() + Duration::seconds(75);
        let output = ResolveToolCall::new(&session).execute("lookup_account").unwrap();

        assert_eq!(output.tool, "lookup_account");
        assert_eq!(output.parameters["account"], "acc-42");
        assert_eq!(output.parameters["auth"], "Bearer sk-123");
        assert_eq!(output.parameters["elapsed"], "75");
        assert_eq!(output.parameters["at"], "2024-01-26T12:01:15Z");
        assert!(output.is_complete);
    }

    #[test]
    fn test_each_invocation_samples_again() {
        let clock = Arc::new(ManualClock(Mutex::new(t0())));
        let session = session(clock.clone(), ResolverSettings::fail());
        let use_case = ResolveToolCall::new(&session);

        *clock.0.lock().unwrap() = t0() + Duration::seconds(10);
        let first = use_case.execute("lookup_account").unwrap();
        *clock.0.lock().unwrap() = t0() + Duration::seconds(20);
        let second = use_case.execute("lookup_account").unwrap();

        assert_eq!(first.parameters["elapsed"], "10");
        assert_eq!(second.parameters["elapsed"], "20");
    }

    #[test]
    fn test_unknown_tool() {
        let clock = Arc::new(ManualClock(Mutex::new(t0())));
        let session = session(clock, ResolverSettings::fail());
        let err = ResolveToolCall::new(&session).execute("nope").unwrap_err();
        assert_eq!(err, ApplicationError::UnknownTool("nope".to_string()));
    }

    #[test]
    fn test_failure_names_tool_parameter() {
        let clock = Arc::new(ManualClock(Mutex::new(t0())));
        let session = session(clock, ResolverSettings::fail());
        let err = ResolveToolCall::new(&session).execute("broken").unwrap_err();

        assert_eq!(
            err,
            ApplicationError::Resolution {
                field: "tool:broken.q".to_string(),
                source: DomainError::UndefinedVariable {
                    name: "missing".to_string(),
                    offset: Some(0),
                },
            }
        );
    }

    #[test]
    fn test_passthrough_keeps_placeholder() {
        let clock = Arc::new(ManualClock(Mutex::new(t0())));
        let session = session(clock, ResolverSettings::passthrough());
        let output = ResolveToolCall::new(&session).execute("broken").unwrap();

        assert_eq!(output.parameters["q"], "{{missing}}");
        assert_eq!(output.all_unresolved, ["missing"]);
        assert!(!output.is_complete);
    }

    #[test]
    fn test_ad_hoc_parameters() {
        let clock = Arc::new(ManualClock(Mutex::new(t0())));
        let session = session(clock, ResolverSettings::fail());

        let mut templates = BTreeMap::new();
        templates.insert("who".to_string(), "{{system__agent_id}}".to_string());
        let output = ResolveToolCall::new(&session)
            .execute_parameters("custom", &templates)
            .unwrap();

        assert_eq!(output.parameters["who"], "agent_123");
    }
}
