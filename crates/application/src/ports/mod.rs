//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the resolver core and the hosting
//! runtime. Adapters live in the infrastructure layer.

mod clock;

pub use clock::Clock;
