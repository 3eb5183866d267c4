//! Scope primitives for Atrium (Layer 1).
//!
//! `atrium_scope` provides the state containers the lifecycle layer
//! orchestrates:
//!
//! - [`attributes`] - Type-erased attribute values and the string-keyed container
//! - [`application`] - The process-wide application scope
//! - [`session`] - Per-client session scopes and identifiers
//! - [`time`] - Injectable clock used for expiry and uptime
//! - [`error`] - Scope operation error taxonomy
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Atrium architecture:
//!
//! - **Layer 1** (`atrium_scope`): scope and attribute primitives (this crate)
//! - **Layer 2** (`atrium_lifecycle`): events, listeners, and the scope host
//! - **Layer 3** (`atrium_telemetry`): observability built on the listener contract
//!
//! Scope objects here are passive: creation, destruction, and every observable
//! mutation go through the Layer 2 host, which is what guarantees listeners
//! see each transition exactly once.

/// Type-erased attribute values and the string-keyed container.
pub mod attributes;

/// The process-wide application scope.
pub mod application;

/// Error taxonomy for scope operations.
pub mod error;

/// Per-client session scopes and identifiers.
pub mod session;

/// Injectable clock for expiry and uptime decisions.
pub mod time;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::application::ApplicationScope;
    pub use crate::attributes::{AttributeValue, Attributes};
    pub use crate::error::ScopeError;
    pub use crate::session::{SessionId, SessionScope};
    pub use crate::time::{Clock, ClockProvider};
}
