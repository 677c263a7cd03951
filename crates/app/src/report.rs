//! Command output.

use std::fmt::Write as _;

use dynvar_application::{ConversationStartOutput, Session, ToolCallOutput};
use dynvar_domain::OnUnresolved;
use serde::Serialize;

/// What one invocation rendered.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Agent the session was started for.
    pub agent_id: String,
    /// Conversation identifier of the session.
    pub conversation_id: String,
    /// Policy the session resolved with.
    pub on_unresolved: OnUnresolved,
    /// Prompt fields, when no tool was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_start: Option<ConversationStartOutput>,
    /// Tool calls, in the order requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallOutput>,
    /// Whether every placeholder resolved.
    pub is_complete: bool,
}

impl Report {
    pub(crate) fn conversation_start(session: &Session, output: ConversationStartOutput) -> Self {
        Self {
            agent_id: session.system().metadata().agent_id.clone(),
            conversation_id: session.conversation_id().to_string(),
            on_unresolved: session.resolver().settings().on_unresolved,
            is_complete: output.is_complete,
            conversation_start: Some(output),
            tool_calls: Vec::new(),
        }
    }

    pub(crate) fn tool_calls(session: &Session, outputs: Vec<ToolCallOutput>) -> Self {
        Self {
            agent_id: session.system().metadata().agent_id.clone(),
            conversation_id: session.conversation_id().to_string(),
            on_unresolved: session.resolver().settings().on_unresolved,
            is_complete: outputs.iter().all(|o| o.is_complete),
            conversation_start: None,
            tool_calls: outputs,
        }
    }

    /// Plain-text rendering: one `[section]` header per field.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        if let Some(start) = &self.conversation_start {
            let _ = writeln!(out, "[system_prompt]\n{}", start.system_prompt.resolved);
            if let Some(first) = &start.first_message {
                let _ = writeln!(out, "\n[first_message]\n{}", first.resolved);
            }
        }

        for (i, call) in self.tool_calls.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[tool:{}]", call.tool);
            for (name, value) in &call.parameters {
                let _ = writeln!(out, "{name}={value}");
            }
        }

        out
    }
}
