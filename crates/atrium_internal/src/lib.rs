//! # Atrium Internal Library
//!
//! Re-exports the core Atrium crates for convenience.

/// Layer 1: scope and attribute primitives.
pub use atrium_scope;

/// Layer 2: lifecycle events, listeners, and the scope host.
pub use atrium_lifecycle;

/// Layer 3: tracing setup and the event-logging observer.
pub use atrium_telemetry;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use atrium_lifecycle::prelude::*;
    pub use atrium_scope::prelude::*;
    pub use atrium_telemetry::{EventLogger, LogFormat, Telemetry};
}
