//! Lifecycle events, listeners, and the scope host for Atrium (Layer 2).
//!
//! `atrium_lifecycle` implements both sides of the scope-lifecycle observer
//! contract:
//!
//! - [`events`] - The unified [`ScopeEvent`](events::ScopeEvent) enum listeners receive
//! - [`schedule`] - Marker types identifying the seven hook points
//! - [`registry`] - Named listener registration and synchronous dispatch
//! - [`observer`] - Observer-capability traits and capability composition
//! - [`host`] - The [`ScopeHost`](host::ScopeHost) that owns scopes and fires events
//!
//! # Delivery Contract
//!
//! Every lifecycle or mutation event is delivered to registered listeners
//! exactly once, synchronously, on the thread performing the triggering
//! action — after the scope exists for creation events, and before the
//! scope's storage is reclaimed for destruction events. Listeners must not
//! block and must not fail; the host defines no recovery path for them.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use atrium_lifecycle::host::ScopeHost;
//! use atrium_lifecycle::observer::SessionAttributeObserver;
//! use atrium_scope::attributes::AttributeValue;
//! use atrium_scope::session::SessionId;
//!
//! struct AuditTrail;
//!
//! impl SessionAttributeObserver for AuditTrail {
//!     fn attribute_added(&self, session_id: &SessionId, key: &str, _value: &AttributeValue) {
//!         tracing::info!(%session_id, key, "attribute added");
//!     }
//! }
//!
//! let host = ScopeHost::new("storefront");
//! host.listeners().attach_attribute_observer("audit", Arc::new(AuditTrail)).unwrap();
//!
//! host.start().unwrap();
//! let session = host.create_session().unwrap();
//! host.put_attribute(&session, "cart", vec!["item-1"]).unwrap();
//! host.shutdown().unwrap();
//! ```

/// Unified event enum for scope lifecycle listeners.
pub mod events;

/// Scope host owning the scopes and firing the events.
pub mod host;

/// Observer-capability traits and attachment.
pub mod observer;

/// Listener registration and dispatch.
pub mod registry;

/// Schedule markers for the seven hook points.
pub mod schedule;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::events::{DestroyReason, ScopeEvent};
    pub use crate::host::ScopeHost;
    pub use crate::observer::{
        ApplicationObserver, LifecycleObserver, SessionAttributeObserver, SessionObserver,
    };
    pub use crate::registry::{BoxedListener, ListenerRegistry, RegistrationError};
    pub use crate::schedule::{
        IntoScheduleIds, OnApplicationStart, OnApplicationStop, OnAttributeAdded,
        OnAttributeRemoved, OnAttributeReplaced, OnSessionCreate, OnSessionDestroy, Schedule,
        ScheduleId,
    };
}
