//! Session configuration files.

mod loader;

pub use loader::{ConfigError, ConfigFormat, load_session_config, parse_session_config};
