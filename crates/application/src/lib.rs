//! dynvar Application - Resolution engine, ports and use cases
//!
//! This crate defines the application layer with:
//! - The placeholder scanner and substitution engine
//! - The system variable provider and its clock port
//! - Session start and rendering use cases
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod session;
pub mod use_cases;
pub mod variable_resolver;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::Clock;
pub use session::Session;
pub use use_cases::{
    ConversationStartOutput, RenderConversationStart, ResolveToolCall, StartSession,
    ToolCallOutput,
};
