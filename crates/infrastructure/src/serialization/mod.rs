//! Deterministic JSON serialization for resolution reports.
//!
//! Keys come out in a stable order (via `BTreeMap` in the report types) with
//! 2-space indentation and a trailing newline, so reports diff cleanly.

mod json;

pub use json::*;
