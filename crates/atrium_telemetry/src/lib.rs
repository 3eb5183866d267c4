//! Observability for Atrium (Layer 3).
//!
//! `atrium_telemetry` provides the tracing side of the lifecycle contract:
//!
//! - [`Telemetry`] - Builder that configures and installs the `tracing` subscriber
//! - [`EventLogger`] - Observer that logs every scope lifecycle event
//!
//! Hosts that want logs for free wire both together:
//!
//! ```
//! use atrium_lifecycle::host::ScopeHost;
//! use atrium_telemetry::{EventLogger, LogFormat, Telemetry};
//!
//! Telemetry::new().with_format(LogFormat::Compact).init();
//!
//! let host = ScopeHost::new("demo");
//! EventLogger::attach_to(host.listeners()).unwrap();
//! host.start().unwrap();
//! ```

/// Event-logging observer.
pub mod logger;

/// Tracing subscriber configuration.
pub mod subscriber;

pub use logger::EventLogger;
pub use subscriber::{LogFormat, Telemetry};
