//! Listener registration and dispatch.
//!
//! The [`ListenerRegistry`] is where hosts and embedders register lifecycle
//! listeners. Listeners are organized by schedule (hook point) and invoked
//! synchronously, in registration order, on the thread that performed the
//! triggering action.
//!
//! # Multi-Schedule Registration
//!
//! Register one listener on multiple schedules using tuple syntax:
//!
//! ```
//! use atrium_lifecycle::events::ScopeEvent;
//! use atrium_lifecycle::registry::ListenerRegistry;
//! use atrium_lifecycle::schedule::{OnSessionCreate, OnSessionDestroy};
//!
//! let registry = ListenerRegistry::new();
//! registry
//!     .register::<(OnSessionCreate, OnSessionDestroy), _>("tracker", |event: &ScopeEvent| {
//!         match event {
//!             ScopeEvent::SessionCreated { session_id } => {
//!                 tracing::debug!(%session_id, "created");
//!             }
//!             ScopeEvent::SessionDestroyed { session_id, .. } => {
//!                 tracing::debug!(%session_id, "destroyed");
//!             }
//!             _ => {}
//!         }
//!     })
//!     .unwrap();
//! ```
//!
//! # Failure Contract
//!
//! Listener callbacks return `()` and must not fail: the host has no recovery
//! path for listener errors, so anything fallible belongs behind the
//! listener's own logging.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::events::ScopeEvent;
use crate::schedule::{IntoScheduleIds, ScheduleId};

// ─────────────────────────────────────────────────────────────────────────────
// BoxedListener
// ─────────────────────────────────────────────────────────────────────────────

/// Type-erased listener that receives `&ScopeEvent` directly.
///
/// Most users should use [`ListenerRegistry::register`] or the observer
/// attachment methods instead of creating `BoxedListener` directly.
pub struct BoxedListener {
    /// The listener callback.
    handler: Box<dyn Fn(&ScopeEvent) + Send + Sync>,
}

impl BoxedListener {
    /// Instantiates a new `BoxedListener` with the given handler.
    #[must_use]
    pub fn new(handler: impl Fn(&ScopeEvent) + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Invokes the listener with the given event.
    pub fn invoke(&self, event: &ScopeEvent) {
        (self.handler)(event);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during listener registration.
#[derive(Debug, Clone)]
pub enum RegistrationError {
    /// A listener with this name already exists on the schedule.
    DuplicateName {
        /// The schedule where the duplicate was found.
        schedule: ScheduleId,
        /// The duplicate listener name.
        name: String,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::DuplicateName { schedule, name } => {
                write!(
                    f,
                    "listener '{}' already registered for schedule '{}'",
                    name,
                    schedule.type_name()
                )
            }
        }
    }
}

impl core::error::Error for RegistrationError {}

// ─────────────────────────────────────────────────────────────────────────────
// ListenerEntry
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the listener registry, containing metadata and the callback.
struct ListenerEntry {
    /// Human-readable name for debugging and duplicate detection.
    name: String,
    /// The listener callback.
    listener: BoxedListener,
}

// ─────────────────────────────────────────────────────────────────────────────
// ListenerRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of lifecycle listeners, organized by schedule.
///
/// # Thread Safety
///
/// The registry uses interior mutability via [`RwLock`], so registration and
/// invocation are both safe from multiple threads. The registry itself holds
/// no other state: listeners are shared and immutable, which is what makes
/// concurrent dispatch safe without additional locking.
#[derive(Default)]
pub struct ListenerRegistry {
    /// Maps schedule ID to a list of listener entries.
    listeners: RwLock<HashMap<ScheduleId, Vec<ListenerEntry>>>,
}

impl ListenerRegistry {
    /// Creates a new empty listener registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a listener for one or more schedules.
    ///
    /// # Type Parameters
    ///
    /// * `S` - Schedule marker type(s). Can be a single schedule or a tuple.
    /// * `F` - The listener function type (inferred)
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if a listener with this
    /// name already exists on one of the schedules. The same name on
    /// different schedules is allowed; multi-schedule registrations are
    /// suffixed with `@<schedule>` to keep their entries distinct.
    pub fn register<S, F>(&self, name: impl Into<String>, listener: F) -> Result<&Self, RegistrationError>
    where
        S: IntoScheduleIds,
        F: Fn(&ScopeEvent) + Send + Sync + 'static,
    {
        let schedules = S::schedule_ids();
        let name = name.into();
        // Arc so the same callback can back every schedule's entry
        let listener = Arc::new(listener);

        for schedule in &schedules {
            let entry_name = if schedules.len() > 1 {
                format!("{}@{}", name, schedule.type_name())
            } else {
                name.clone()
            };
            let listener_clone = Arc::clone(&listener);

            self.register_boxed(
                *schedule,
                entry_name,
                BoxedListener::new(move |event: &ScopeEvent| {
                    listener_clone(event);
                }),
            )?;
        }
        Ok(self)
    }

    /// Registers a pre-built [`BoxedListener`] for the given schedule.
    ///
    /// This is the lower-level registration method used by
    /// [`register`](Self::register) and the observer attachment methods.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if a listener with this
    /// name already exists on the schedule.
    pub fn register_boxed(
        &self,
        schedule: ScheduleId,
        name: impl Into<String>,
        listener: BoxedListener,
    ) -> Result<(), RegistrationError> {
        let name = name.into();

        let mut listeners = self.listeners.write();
        let entries = listeners.entry(schedule).or_default();

        if entries.iter().any(|entry| entry.name == name) {
            return Err(RegistrationError::DuplicateName { schedule, name });
        }

        entries.push(ListenerEntry { name, listener });
        Ok(())
    }

    /// Invokes all listeners registered for the given schedule.
    ///
    /// Listeners execute synchronously on the calling thread, in
    /// registration order. A schedule with no listeners is a no-op.
    pub fn invoke(&self, schedule: ScheduleId, event: &ScopeEvent) {
        let listeners = self.listeners.read();

        if let Some(entries) = listeners.get(&schedule) {
            for entry in entries {
                entry.listener.invoke(event);
            }
        }
    }

    /// Returns the number of listeners registered for the given schedule.
    #[must_use]
    pub fn listener_count(&self, schedule: ScheduleId) -> usize {
        let listeners = self.listeners.read();
        listeners.get(&schedule).map_or(0, Vec::len)
    }

    /// Checks if a listener with the given name exists on the schedule.
    #[must_use]
    pub fn contains_listener(&self, schedule: ScheduleId, name: &str) -> bool {
        let listeners = self.listeners.read();
        listeners
            .get(&schedule)
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }
}
