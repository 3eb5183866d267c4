//! Scope host: owns the scopes and fires the lifecycle events.
//!
//! The [`ScopeHost`] is the container side of the listener contract. It owns
//! the application scope and the session registry, and it is the only code
//! that creates, mutates, or destroys scopes — which is what lets it
//! guarantee that every transition is delivered to listeners exactly once,
//! synchronously, on the thread performing the triggering action.
//!
//! # Lifecycle
//!
//! The host moves linearly through three states:
//!
//! 1. **Not started** — listeners can be registered, no scope exists
//! 2. **Running** — `start()` created the application scope; sessions can be
//!    created, mutated, and destroyed
//! 3. **Terminated** — `shutdown()` destroyed every remaining session and
//!    the application scope; the host accepts no further operations
//!
//! # Dispatch Discipline
//!
//! Internal locks are always released before listeners run, so a listener
//! may call back into the host. The cost is a small window during
//! destruction where the scope has already left the registry but its
//! destruction event is still being delivered; the scope value itself stays
//! alive until every listener has returned.
//!
//! # Example
//!
//! ```
//! use atrium_lifecycle::host::ScopeHost;
//! use atrium_lifecycle::events::ScopeEvent;
//! use atrium_lifecycle::schedule::OnSessionCreate;
//!
//! let host = ScopeHost::new("demo");
//! host.listeners()
//!     .register::<OnSessionCreate, _>("greeter", |event: &ScopeEvent| {
//!         if let ScopeEvent::SessionCreated { session_id } = event {
//!             tracing::info!(%session_id, "welcome");
//!         }
//!     })
//!     .unwrap();
//!
//! host.start().unwrap();
//! let session = host.create_session().unwrap();
//! host.put_attribute(&session, "user", "alice".to_string()).unwrap();
//! host.shutdown().unwrap();
//! ```

use core::time::Duration;

use hashbrown::HashMap;
use parking_lot::RwLock;

use atrium_scope::application::ApplicationScope;
use atrium_scope::attributes::AttributeValue;
use atrium_scope::error::ScopeError;
use atrium_scope::session::{SessionId, SessionScope};
use atrium_scope::time::Clock;

use crate::events::{DestroyReason, ScopeEvent};
use crate::registry::ListenerRegistry;

/// Lifecycle state of the host.
///
/// Progresses linearly: `NotStarted` → `Running` → `Terminated`.
enum HostState {
    /// `start()` has not been called yet.
    NotStarted,
    /// The application scope is live.
    Running(ApplicationScope),
    /// `shutdown()` has completed; the host is terminal.
    Terminated,
}

/// The container that owns scopes and notifies listeners of their lifecycle.
///
/// All methods take `&self`; the host is `Send + Sync` and can be shared
/// across worker threads. Events fire on whatever thread performs the
/// triggering call.
pub struct ScopeHost {
    /// The application's name, echoed in application-level events.
    name: String,
    /// Time source for expiry and uptime.
    clock: Clock,
    /// Registered lifecycle listeners.
    listeners: ListenerRegistry,
    /// Current lifecycle state, holding the application scope while running.
    state: RwLock<HostState>,
    /// Live session scopes keyed by ID.
    sessions: RwLock<HashMap<SessionId, SessionScope>>,
}

impl ScopeHost {
    /// Creates a host for an application with the given name.
    ///
    /// The host starts in the not-started state; call
    /// [`start()`](Self::start) to create the application scope.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clock: Clock::system(),
            listeners: ListenerRegistry::new(),
            state: RwLock::new(HostState::NotStarted),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the host's clock.
    ///
    /// Use this to drive expiry deterministically in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the listener registry for registration.
    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Returns the application's name.
    #[must_use]
    pub fn application_name(&self) -> &str {
        &self.name
    }

    /// Returns `true` while the application scope is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(*self.state.read(), HostState::Running(_))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Application Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates the application scope and notifies
    /// [`OnApplicationStart`](crate::schedule::OnApplicationStart) listeners.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::AlreadyStarted`] if the host is already running
    /// - [`ScopeError::Terminated`] if the host was shut down
    pub fn start(&self) -> Result<(), ScopeError> {
        {
            let mut state = self.state.write();
            match *state {
                HostState::NotStarted => {
                    *state = HostState::Running(ApplicationScope::new(&self.name, self.clock.now()));
                }
                HostState::Running(_) => return Err(ScopeError::AlreadyStarted),
                HostState::Terminated => return Err(ScopeError::Terminated),
            }
        }

        tracing::info!(name = %self.name, "application scope started");
        self.fire(&ScopeEvent::ApplicationStarted {
            name: self.name.clone(),
        });
        Ok(())
    }

    /// Destroys every remaining session, then the application scope.
    ///
    /// Each session receives its
    /// [`SessionDestroyed`](ScopeEvent::SessionDestroyed) event (reason
    /// [`DestroyReason::Shutdown`]) before
    /// [`ApplicationStopped`](ScopeEvent::ApplicationStopped) fires. The
    /// host is terminal afterwards.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::NotStarted`] if the host never started
    /// - [`ScopeError::Terminated`] if the host was already shut down
    pub fn shutdown(&self) -> Result<(), ScopeError> {
        let application = {
            let mut state = self.state.write();
            match core::mem::replace(&mut *state, HostState::Terminated) {
                HostState::Running(application) => application,
                HostState::NotStarted => {
                    *state = HostState::NotStarted;
                    return Err(ScopeError::NotStarted);
                }
                HostState::Terminated => return Err(ScopeError::Terminated),
            }
        };

        let drained: Vec<SessionScope> = {
            let mut sessions = self.sessions.write();
            sessions.drain().map(|(_, scope)| scope).collect()
        };

        for scope in &drained {
            tracing::debug!(session_id = %scope.id(), "session destroyed at shutdown");
            self.fire(&ScopeEvent::SessionDestroyed {
                session_id: scope.id().clone(),
                reason: DestroyReason::Shutdown,
            });
        }

        let uptime = self.clock.elapsed_since(application.started_at());
        tracing::info!(name = %self.name, ?uptime, "application scope stopped");
        self.fire(&ScopeEvent::ApplicationStopped {
            name: self.name.clone(),
            uptime,
        });
        // `application` and the drained scopes are dropped here, after every
        // listener has seen their destruction events.
        Ok(())
    }

    /// Runs a closure against the application scope's state.
    ///
    /// # Errors
    ///
    /// Fails with the usual state errors when the host is not running.
    pub fn with_application<R>(
        &self,
        f: impl FnOnce(&ApplicationScope) -> R,
    ) -> Result<R, ScopeError> {
        let state = self.state.read();
        match &*state {
            HostState::Running(application) => Ok(f(application)),
            HostState::NotStarted => Err(ScopeError::NotStarted),
            HostState::Terminated => Err(ScopeError::Terminated),
        }
    }

    /// Runs a closure against the application scope's mutable state.
    ///
    /// Application attribute mutations are not observable events; only
    /// session attributes are.
    ///
    /// # Errors
    ///
    /// Fails with the usual state errors when the host is not running.
    pub fn with_application_mut<R>(
        &self,
        f: impl FnOnce(&mut ApplicationScope) -> R,
    ) -> Result<R, ScopeError> {
        let mut state = self.state.write();
        match &mut *state {
            HostState::Running(application) => Ok(f(application)),
            HostState::NotStarted => Err(ScopeError::NotStarted),
            HostState::Terminated => Err(ScopeError::Terminated),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates a session scope and notifies
    /// [`OnSessionCreate`](crate::schedule::OnSessionCreate) listeners
    /// before returning the new ID.
    ///
    /// # Errors
    ///
    /// Fails with the usual state errors when the host is not running.
    pub fn create_session(&self) -> Result<SessionId, ScopeError> {
        self.ensure_running()?;

        let id = SessionId::new();
        {
            let mut sessions = self.sessions.write();
            sessions.insert(id.clone(), SessionScope::new(id.clone(), self.clock.now()));
        }

        tracing::debug!(session_id = %id, "session created");
        self.fire(&ScopeEvent::SessionCreated {
            session_id: id.clone(),
        });
        Ok(id)
    }

    /// Destroys a session and notifies
    /// [`OnSessionDestroy`](crate::schedule::OnSessionDestroy) listeners
    /// (reason [`DestroyReason::Invalidated`]).
    ///
    /// The session leaves the registry before listeners run, so no attribute
    /// event for this ID can fire after the destruction event.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::SessionNotFound`] if the ID is unknown
    /// - the usual state errors when the host is not running
    pub fn destroy_session(&self, id: &SessionId) -> Result<(), ScopeError> {
        self.ensure_running()?;

        let scope = {
            let mut sessions = self.sessions.write();
            sessions
                .remove(id)
                .ok_or_else(|| ScopeError::SessionNotFound(id.clone()))?
        };

        tracing::debug!(session_id = %id, "session destroyed");
        self.fire(&ScopeEvent::SessionDestroyed {
            session_id: id.clone(),
            reason: DestroyReason::Invalidated,
        });
        // `scope` is dropped here, after listeners have run.
        drop(scope);
        Ok(())
    }

    /// Destroys every session idle for at least `max_idle` and returns their
    /// IDs.
    ///
    /// Each destroyed session receives its destruction event with reason
    /// [`DestroyReason::Expired`]. Idle time is measured against the host's
    /// [`Clock`] since the last attribute access or [`touch`](Self::touch).
    ///
    /// # Errors
    ///
    /// Fails with the usual state errors when the host is not running.
    pub fn expire_idle(&self, max_idle: Duration) -> Result<Vec<SessionId>, ScopeError> {
        self.ensure_running()?;

        let now = self.clock.now();
        let expired: Vec<SessionScope> = {
            let mut sessions = self.sessions.write();
            let victims: Vec<SessionId> = sessions
                .iter()
                .filter(|(_, scope)| scope.idle_for(now) >= max_idle)
                .map(|(id, _)| id.clone())
                .collect();
            victims
                .iter()
                .filter_map(|id| sessions.remove(id))
                .collect()
        };

        let mut ids = Vec::with_capacity(expired.len());
        for scope in &expired {
            tracing::debug!(session_id = %scope.id(), "session expired");
            self.fire(&ScopeEvent::SessionDestroyed {
                session_id: scope.id().clone(),
                reason: DestroyReason::Expired,
            });
            ids.push(scope.id().clone());
        }
        Ok(ids)
    }

    /// Returns `true` if a session with the given ID is live.
    #[must_use]
    pub fn contains_session(&self, id: &SessionId) -> bool {
        self.sessions.read().contains_key(id)
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Refreshes a session's last-accessed instant without touching its
    /// attributes.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::SessionNotFound`] if the ID is unknown
    /// - the usual state errors when the host is not running
    pub fn touch(&self, id: &SessionId) -> Result<(), ScopeError> {
        self.ensure_running()?;

        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let scope = sessions
            .get_mut(id)
            .ok_or_else(|| ScopeError::SessionNotFound(id.clone()))?;
        scope.touch(now);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session Attributes
    // ─────────────────────────────────────────────────────────────────────────

    /// Stores a session attribute, notifying
    /// [`OnAttributeAdded`](crate::schedule::OnAttributeAdded) listeners for
    /// a fresh key or
    /// [`OnAttributeReplaced`](crate::schedule::OnAttributeReplaced)
    /// listeners (with the old and new values) for an overwrite.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::SessionNotFound`] if the ID is unknown
    /// - the usual state errors when the host is not running
    pub fn put_attribute<T: Send + Sync + 'static>(
        &self,
        id: &SessionId,
        key: impl Into<String>,
        value: T,
    ) -> Result<(), ScopeError> {
        self.put_attribute_value(id, key, AttributeValue::new(value))
    }

    /// Stores an already-wrapped [`AttributeValue`].
    ///
    /// This is the non-generic path behind
    /// [`put_attribute`](Self::put_attribute); use it when forwarding values
    /// that are already type-erased.
    ///
    /// # Errors
    ///
    /// Same as [`put_attribute`](Self::put_attribute).
    pub fn put_attribute_value(
        &self,
        id: &SessionId,
        key: impl Into<String>,
        value: AttributeValue,
    ) -> Result<(), ScopeError> {
        self.ensure_running()?;

        let key = key.into();
        let now = self.clock.now();
        let old = {
            let mut sessions = self.sessions.write();
            let scope = sessions
                .get_mut(id)
                .ok_or_else(|| ScopeError::SessionNotFound(id.clone()))?;
            scope.touch(now);
            scope.attributes_mut().insert(key.clone(), value.clone())
        };

        let event = match old {
            Some(old) => {
                tracing::trace!(session_id = %id, %key, "attribute replaced");
                ScopeEvent::AttributeReplaced {
                    session_id: id.clone(),
                    key,
                    old,
                    new: value,
                }
            }
            None => {
                tracing::trace!(session_id = %id, %key, "attribute added");
                ScopeEvent::AttributeAdded {
                    session_id: id.clone(),
                    key,
                    value,
                }
            }
        };
        self.fire(&event);
        Ok(())
    }

    /// Returns a session attribute, if present.
    ///
    /// The returned value shares storage with the session (attribute values
    /// are `Arc`-backed). Reading refreshes the session's last-accessed
    /// instant.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::SessionNotFound`] if the ID is unknown
    /// - the usual state errors when the host is not running
    pub fn get_attribute(
        &self,
        id: &SessionId,
        key: &str,
    ) -> Result<Option<AttributeValue>, ScopeError> {
        self.ensure_running()?;

        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let scope = sessions
            .get_mut(id)
            .ok_or_else(|| ScopeError::SessionNotFound(id.clone()))?;
        scope.touch(now);
        Ok(scope.attributes().get(key).cloned())
    }

    /// Returns the keys stored in a session.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::SessionNotFound`] if the ID is unknown
    /// - the usual state errors when the host is not running
    pub fn attribute_keys(&self, id: &SessionId) -> Result<Vec<String>, ScopeError> {
        self.ensure_running()?;

        let sessions = self.sessions.read();
        let scope = sessions
            .get(id)
            .ok_or_else(|| ScopeError::SessionNotFound(id.clone()))?;
        Ok(scope.attributes().keys().map(str::to_owned).collect())
    }

    /// Deletes a session attribute, notifying
    /// [`OnAttributeRemoved`](crate::schedule::OnAttributeRemoved) listeners
    /// with the removed value. Deleting an absent key fires nothing.
    ///
    /// Returns the removed value, if any.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::SessionNotFound`] if the ID is unknown
    /// - the usual state errors when the host is not running
    pub fn remove_attribute(
        &self,
        id: &SessionId,
        key: &str,
    ) -> Result<Option<AttributeValue>, ScopeError> {
        self.ensure_running()?;

        let now = self.clock.now();
        let removed = {
            let mut sessions = self.sessions.write();
            let scope = sessions
                .get_mut(id)
                .ok_or_else(|| ScopeError::SessionNotFound(id.clone()))?;
            scope.touch(now);
            scope.attributes_mut().remove(key)
        };

        if let Some(value) = &removed {
            tracing::trace!(session_id = %id, %key, "attribute removed");
            self.fire(&ScopeEvent::AttributeRemoved {
                session_id: id.clone(),
                key: key.to_owned(),
                value: value.clone(),
            });
        }
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    /// Fails unless the application scope is live.
    fn ensure_running(&self) -> Result<(), ScopeError> {
        match *self.state.read() {
            HostState::Running(_) => Ok(()),
            HostState::NotStarted => Err(ScopeError::NotStarted),
            HostState::Terminated => Err(ScopeError::Terminated),
        }
    }

    /// Dispatches an event to the listeners of its schedule.
    ///
    /// Callers must not hold any host lock here.
    fn fire(&self, event: &ScopeEvent) {
        self.listeners.invoke(event.schedule_id(), event);
    }
}
