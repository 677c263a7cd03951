//! Render conversation start use case

use serde::Serialize;

use crate::error::{ApplicationError, ApplicationResult};
use crate::session::Session;
use crate::variable_resolver::{FieldKind, ResolutionResult};

/// The prompt-level fields of a session, resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationStartOutput {
    /// The resolved system prompt.
    pub system_prompt: ResolutionResult,
    /// The resolved first message, if the agent defines one.
    pub first_message: Option<ResolutionResult>,
    /// Whether every placeholder in both fields was resolved.
    pub is_complete: bool,
    /// All unresolved placeholder names, sorted and deduplicated.
    pub all_unresolved: Vec<String>,
}

/// Resolves the system prompt and first message at the snapshot cadence.
pub struct RenderConversationStart<'a> {
    session: &'a Session,
}

impl<'a> RenderConversationStart<'a> {
    /// Creates the use case for `session`.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Executes the use case.
    ///
    /// # Errors
    ///
    /// Under the fail policy, returns [`ApplicationError::Resolution`] naming
    /// the first field with an unresolved placeholder.
    pub fn execute(&self) -> ApplicationResult<ConversationStartOutput> {
        let agent = self.session.agent();
        let frame = self.session.system().snapshot_frame();

        let system_prompt = self
            .session
            .render_with_frame(FieldKind::SystemPrompt, &agent.prompt, &frame)
            .map_err(|e| ApplicationError::resolution(FieldKind::SystemPrompt.as_str(), e))?;

        let first_message = agent
            .first_message
            .as_deref()
            .map(|text| {
                self.session
                    .render_with_frame(FieldKind::FirstMessage, text, &frame)
                    .map_err(|e| ApplicationError::resolution(FieldKind::FirstMessage.as_str(), e))
            })
            .transpose()?;

        let mut all_unresolved: Vec<String> = system_prompt
            .unresolved
            .iter()
            .chain(first_message.iter().flat_map(|r| r.unresolved.iter()))
            .map(|u| u.name.clone())
            .collect();
        all_unresolved.sort();
        all_unresolved.dedup();

        Ok(ConversationStartOutput {
            system_prompt,
            first_message,
            is_complete: all_unresolved.is_empty(),
            all_unresolved,
        })
    }
}
