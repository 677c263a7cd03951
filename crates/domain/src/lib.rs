//! dynvar Domain - Core types for dynamic variables
//!
//! This crate defines the data model for session-scoped dynamic variables:
//! typed values, the per-session registry, reserved naming rules and
//! resolver settings. All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod error;
pub mod id;
pub mod session;
pub mod settings;
pub mod variable;

pub use config::{AgentConfig, SessionConfig, ToolConfig};
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use session::SessionMetadata;
pub use settings::{OnUnresolved, ResolverSettings};
pub use variable::{
    ResolvedVariable, SECRET_PREFIX, SYSTEM_PREFIX, Variable, VariableOrigin, VariableSet,
    VariableValue,
};
