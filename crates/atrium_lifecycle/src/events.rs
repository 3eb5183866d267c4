//! Unified event enum for scope lifecycle listeners.
//!
//! All listeners receive `&ScopeEvent` and can match on variants for typed
//! access.
//!
//! # Example
//!
//! ```ignore
//! use atrium_lifecycle::events::ScopeEvent;
//!
//! fn handle_event(event: &ScopeEvent) {
//!     match event {
//!         ScopeEvent::SessionCreated { session_id } => {
//!             println!("session {} created", session_id);
//!         }
//!         ScopeEvent::AttributeAdded { key, .. } => {
//!             println!("attribute {} added", key);
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use core::fmt;
use core::time::Duration;

use atrium_scope::attributes::AttributeValue;
use atrium_scope::session::SessionId;

use crate::schedule::{
    OnApplicationStart, OnApplicationStop, OnAttributeAdded, OnAttributeRemoved,
    OnAttributeReplaced, OnSessionCreate, OnSessionDestroy, ScheduleId,
};

/// Why a session scope was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyReason {
    /// Explicitly invalidated through the host.
    Invalidated,
    /// Destroyed by an idle-expiry sweep.
    Expired,
    /// Destroyed because the application scope is shutting down.
    Shutdown,
}

/// Unified event enum for all scope lifecycle hooks.
///
/// All listeners receive `&ScopeEvent` and can match on variants for typed
/// access. This design provides:
/// - Simple multi-schedule registration (all listeners receive the same type)
/// - Typed access via pattern matching
///
/// Events are cheap to clone: attribute values are `Arc`-backed and session
/// IDs are reference counted.
#[derive(Debug, Clone)]
pub enum ScopeEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // Application-Level Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Event fired once, after the application scope is created and before
    /// any session exists.
    ApplicationStarted {
        /// The application's name.
        name: String,
    },

    /// Event fired once, after every remaining session has been destroyed
    /// and before the application scope is dropped.
    ApplicationStopped {
        /// The application's name.
        name: String,
        /// Time between start and shutdown.
        uptime: Duration,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Session-Level Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Event fired after a session scope is created, before its ID is
    /// returned to the caller.
    SessionCreated {
        /// The new session's identifier.
        session_id: SessionId,
    },

    /// Event fired after a session scope leaves the registry, before its
    /// memory is reclaimed. No attribute event for the same session can
    /// follow this one.
    SessionDestroyed {
        /// The destroyed session's identifier.
        session_id: SessionId,
        /// Why the session was destroyed.
        reason: DestroyReason,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Session-Attribute Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Event fired once per insertion of a previously absent key.
    AttributeAdded {
        /// The owning session's identifier.
        session_id: SessionId,
        /// The inserted key.
        key: String,
        /// The inserted value.
        value: AttributeValue,
    },

    /// Event fired once per overwrite of an existing key.
    AttributeReplaced {
        /// The owning session's identifier.
        session_id: SessionId,
        /// The overwritten key.
        key: String,
        /// The value that was replaced.
        old: AttributeValue,
        /// The value now stored.
        new: AttributeValue,
    },

    /// Event fired once per deletion of a present key.
    AttributeRemoved {
        /// The owning session's identifier.
        session_id: SessionId,
        /// The deleted key.
        key: String,
        /// The value that was removed.
        value: AttributeValue,
    },
}

impl ScopeEvent {
    /// Returns the schedule name for this event variant.
    ///
    /// This corresponds to the schedule marker type name (e.g.,
    /// `OnSessionCreate`).
    #[must_use]
    pub fn schedule_name(&self) -> &'static str {
        match self {
            ScopeEvent::ApplicationStarted { .. } => "OnApplicationStart",
            ScopeEvent::ApplicationStopped { .. } => "OnApplicationStop",
            ScopeEvent::SessionCreated { .. } => "OnSessionCreate",
            ScopeEvent::SessionDestroyed { .. } => "OnSessionDestroy",
            ScopeEvent::AttributeAdded { .. } => "OnAttributeAdded",
            ScopeEvent::AttributeReplaced { .. } => "OnAttributeReplaced",
            ScopeEvent::AttributeRemoved { .. } => "OnAttributeRemoved",
        }
    }

    /// Returns the [`ScheduleId`] this event dispatches on.
    #[must_use]
    pub fn schedule_id(&self) -> ScheduleId {
        match self {
            ScopeEvent::ApplicationStarted { .. } => ScheduleId::of::<OnApplicationStart>(),
            ScopeEvent::ApplicationStopped { .. } => ScheduleId::of::<OnApplicationStop>(),
            ScopeEvent::SessionCreated { .. } => ScheduleId::of::<OnSessionCreate>(),
            ScopeEvent::SessionDestroyed { .. } => ScheduleId::of::<OnSessionDestroy>(),
            ScopeEvent::AttributeAdded { .. } => ScheduleId::of::<OnAttributeAdded>(),
            ScopeEvent::AttributeReplaced { .. } => ScheduleId::of::<OnAttributeReplaced>(),
            ScopeEvent::AttributeRemoved { .. } => ScheduleId::of::<OnAttributeRemoved>(),
        }
    }

    /// Returns the session ID if this is a session-level event.
    ///
    /// Application-level events return `None`.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            ScopeEvent::ApplicationStarted { .. } | ScopeEvent::ApplicationStopped { .. } => None,
            ScopeEvent::SessionCreated { session_id }
            | ScopeEvent::SessionDestroyed { session_id, .. }
            | ScopeEvent::AttributeAdded { session_id, .. }
            | ScopeEvent::AttributeReplaced { session_id, .. }
            | ScopeEvent::AttributeRemoved { session_id, .. } => Some(session_id),
        }
    }
}

impl fmt::Display for ScopeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeEvent::ApplicationStarted { name } => {
                write!(f, "ApplicationStarted({})", name)
            }
            ScopeEvent::ApplicationStopped { name, uptime } => {
                write!(f, "ApplicationStopped({}, uptime: {:?})", name, uptime)
            }
            ScopeEvent::SessionCreated { session_id } => {
                write!(f, "SessionCreated({})", session_id)
            }
            ScopeEvent::SessionDestroyed { session_id, reason } => {
                write!(f, "SessionDestroyed({}, reason: {:?})", session_id, reason)
            }
            ScopeEvent::AttributeAdded {
                session_id,
                key,
                value,
            } => {
                write!(
                    f,
                    "AttributeAdded({}, key: {}, type: {})",
                    session_id,
                    key,
                    value.type_name()
                )
            }
            ScopeEvent::AttributeReplaced {
                session_id,
                key,
                old,
                new,
            } => {
                write!(
                    f,
                    "AttributeReplaced({}, key: {}, {} -> {})",
                    session_id,
                    key,
                    old.type_name(),
                    new.type_name()
                )
            }
            ScopeEvent::AttributeRemoved {
                session_id, key, ..
            } => {
                write!(f, "AttributeRemoved({}, key: {})", session_id, key)
            }
        }
    }
}
