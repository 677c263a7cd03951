//! Use cases
//!
//! Session start validates configuration once; rendering use cases borrow the
//! started session.

mod render_conversation_start;
mod resolve_tool_call;
mod start_session;

pub use render_conversation_start::{ConversationStartOutput, RenderConversationStart};
pub use resolve_tool_call::{ResolveToolCall, ToolCallOutput};
pub use start_session::StartSession;
