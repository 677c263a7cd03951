//! Variable resolution module
//!
//! Scanning, substitution and system values for `{{variable}}` placeholders.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{DateTime, Utc};
//! use dynvar_application::ports::Clock;
//! use dynvar_application::variable_resolver::{SystemVariableProvider, VariableResolver};
//! use dynvar_domain::{ResolverSettings, SessionMetadata, VariableSet};
//!
//! struct Now;
//! impl Clock for Now {
//!     fn now(&self) -> DateTime<Utc> {
//!         Utc::now()
//!     }
//! }
//!
//! let mut variables = VariableSet::new();
//! variables.register("user_name", "Angelo").unwrap();
//!
//! let system = SystemVariableProvider::new(SessionMetadata::new("agent_1"), Arc::new(Now));
//! let resolver = VariableResolver::new(ResolverSettings::default());
//!
//! let result = resolver
//!     .resolve("Hi {{user_name}} from {{system__agent_id}}", &variables, &system.snapshot_frame())
//!     .unwrap();
//! assert_eq!(result.resolved, "Hi Angelo from agent_1");
//! ```

pub mod engine;
pub mod parser;
pub mod system;

pub use engine::{FieldKind, ResolutionResult, UnresolvedPlaceholder, VariableResolver};
pub use parser::{
    Placeholder, Placeholders, extract_variable_names, has_variables, is_valid_variable_name,
    parse_variables, scan,
};
pub use system::{
    Cadence, SystemFrame, SystemVariable, SystemVariableInfo, SystemVariableProvider, catalog,
};
