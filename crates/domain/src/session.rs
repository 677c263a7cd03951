//! Call/session metadata supplied by the hosting runtime

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// Facts about a conversation that feed the system variables.
///
/// Telephony fields are optional: web and SDK sessions have no caller id or
/// called number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Identifier of the agent handling the conversation.
    #[serde(default)]
    pub agent_id: String,

    /// Conversation identifier.
    #[serde(default = "generate_id")]
    pub conversation_id: String,

    /// Call or session identifier.
    #[serde(default = "generate_id")]
    pub call_sid: String,

    /// Caller phone number, if the session is a phone call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,

    /// Dialled phone number, if the session is a phone call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub called_number: Option<String>,

    /// When the session started. Filled from the clock when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionMetadata {
    /// Creates metadata for `agent_id` with fresh conversation and call ids.
    #[must_use]
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            conversation_id: generate_id(),
            call_sid: generate_id(),
            caller_id: None,
            called_number: None,
            started_at: None,
        }
    }

    /// Sets the conversation id.
    #[must_use]
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = id.into();
        self
    }

    /// Sets the call id.
    #[must_use]
    pub fn with_call_sid(mut self, sid: impl Into<String>) -> Self {
        self.call_sid = sid.into();
        self
    }

    /// Sets caller and called numbers for a phone call.
    #[must_use]
    pub fn with_phone(
        mut self,
        caller_id: impl Into<String>,
        called_number: impl Into<String>,
    ) -> Self {
        self.caller_id = Some(caller_id.into());
        self.called_number = Some(called_number.into());
        self
    }

    /// Sets an explicit start time.
    #[must_use]
    pub const fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }
}
