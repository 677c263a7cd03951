//! dynvar Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete clock behind system variables, the
//! session config file loader and deterministic JSON output.

pub mod adapters;
pub mod config;
pub mod serialization;

pub use adapters::SystemClock;
pub use config::{ConfigError, ConfigFormat, load_session_config, parse_session_config};
pub use serialization::{SerializationError, from_json, to_json_stable};
