//! ID generation utilities.

use uuid::Uuid;

/// Generates a new time-ordered UUID v7 as a string.
///
/// Used for conversation and call identifiers the caller did not supply.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}
