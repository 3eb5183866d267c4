//! Observer-capability traits and their attachment to the registry.
//!
//! The listener contract is split into three independent capability traits —
//! [`ApplicationObserver`], [`SessionObserver`], and
//! [`SessionAttributeObserver`] — so a component implements exactly the
//! capabilities it cares about. A type implementing all three automatically
//! implements [`LifecycleObserver`] and can be attached in one call: no
//! inheritance, just capability composition.
//!
//! Every method has a default no-op body, so the minimal observer is an
//! empty `impl` block per capability.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use atrium_lifecycle::observer::SessionObserver;
//! use atrium_lifecycle::registry::ListenerRegistry;
//! use atrium_scope::session::SessionId;
//!
//! struct SessionCounter;
//!
//! impl SessionObserver for SessionCounter {
//!     fn session_created(&self, session_id: &SessionId) {
//!         tracing::debug!(%session_id, "session created");
//!     }
//! }
//!
//! let registry = ListenerRegistry::new();
//! registry
//!     .attach_session_observer("counter", Arc::new(SessionCounter))
//!     .unwrap();
//! ```

use core::time::Duration;
use std::sync::Arc;

use atrium_scope::attributes::AttributeValue;
use atrium_scope::session::SessionId;

use crate::events::{DestroyReason, ScopeEvent};
use crate::registry::{ListenerRegistry, RegistrationError};
use crate::schedule::{
    OnApplicationStart, OnApplicationStop, OnAttributeAdded, OnAttributeRemoved,
    OnAttributeReplaced, OnSessionCreate, OnSessionDestroy,
};

// ─────────────────────────────────────────────────────────────────────────────
// Capability Traits
// ─────────────────────────────────────────────────────────────────────────────

/// Observer of application scope lifecycle transitions.
pub trait ApplicationObserver: Send + Sync + 'static {
    /// Called after the application scope is created, before any session
    /// exists.
    fn application_started(&self, _name: &str) {}

    /// Called when the application scope is about to be destroyed, after the
    /// destruction of every remaining session.
    fn application_stopped(&self, _name: &str, _uptime: Duration) {}
}

/// Observer of session scope lifecycle transitions.
pub trait SessionObserver: Send + Sync + 'static {
    /// Called after a session is created, before its ID is returned to any
    /// caller.
    fn session_created(&self, _session_id: &SessionId) {}

    /// Called when a session is about to be destroyed, before its memory is
    /// reclaimed.
    fn session_destroyed(&self, _session_id: &SessionId, _reason: DestroyReason) {}
}

/// Observer of session attribute mutations.
pub trait SessionAttributeObserver: Send + Sync + 'static {
    /// Called once per insertion of a previously absent key.
    fn attribute_added(&self, _session_id: &SessionId, _key: &str, _value: &AttributeValue) {}

    /// Called once per overwrite of an existing key.
    fn attribute_replaced(
        &self,
        _session_id: &SessionId,
        _key: &str,
        _old: &AttributeValue,
        _new: &AttributeValue,
    ) {
    }

    /// Called once per deletion of a present key.
    fn attribute_removed(&self, _session_id: &SessionId, _key: &str, _value: &AttributeValue) {}
}

/// Composition of all three observer capabilities.
///
/// Blanket-implemented for any type implementing [`ApplicationObserver`],
/// [`SessionObserver`], and [`SessionAttributeObserver`]. Attach such a type
/// with [`ListenerRegistry::attach`].
pub trait LifecycleObserver: ApplicationObserver + SessionObserver + SessionAttributeObserver {}

impl<T: ApplicationObserver + SessionObserver + SessionAttributeObserver> LifecycleObserver for T {}

// ─────────────────────────────────────────────────────────────────────────────
// Attachment
// ─────────────────────────────────────────────────────────────────────────────

impl ListenerRegistry {
    /// Attaches an [`ApplicationObserver`] to the application schedules.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if the name is taken on
    /// one of the application schedules.
    pub fn attach_application_observer(
        &self,
        name: impl Into<String>,
        observer: Arc<dyn ApplicationObserver>,
    ) -> Result<&Self, RegistrationError> {
        self.register::<(OnApplicationStart, OnApplicationStop), _>(
            name,
            move |event: &ScopeEvent| match event {
                ScopeEvent::ApplicationStarted { name } => observer.application_started(name),
                ScopeEvent::ApplicationStopped { name, uptime } => {
                    observer.application_stopped(name, *uptime);
                }
                _ => {}
            },
        )
    }

    /// Attaches a [`SessionObserver`] to the session schedules.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if the name is taken on
    /// one of the session schedules.
    pub fn attach_session_observer(
        &self,
        name: impl Into<String>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<&Self, RegistrationError> {
        self.register::<(OnSessionCreate, OnSessionDestroy), _>(
            name,
            move |event: &ScopeEvent| match event {
                ScopeEvent::SessionCreated { session_id } => observer.session_created(session_id),
                ScopeEvent::SessionDestroyed { session_id, reason } => {
                    observer.session_destroyed(session_id, *reason);
                }
                _ => {}
            },
        )
    }

    /// Attaches a [`SessionAttributeObserver`] to the attribute schedules.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if the name is taken on
    /// one of the attribute schedules.
    pub fn attach_attribute_observer(
        &self,
        name: impl Into<String>,
        observer: Arc<dyn SessionAttributeObserver>,
    ) -> Result<&Self, RegistrationError> {
        self.register::<(OnAttributeAdded, OnAttributeRemoved, OnAttributeReplaced), _>(
            name,
            move |event: &ScopeEvent| match event {
                ScopeEvent::AttributeAdded {
                    session_id,
                    key,
                    value,
                } => observer.attribute_added(session_id, key, value),
                ScopeEvent::AttributeReplaced {
                    session_id,
                    key,
                    old,
                    new,
                } => observer.attribute_replaced(session_id, key, old, new),
                ScopeEvent::AttributeRemoved {
                    session_id,
                    key,
                    value,
                } => observer.attribute_removed(session_id, key, value),
                _ => {}
            },
        )
    }

    /// Attaches a [`LifecycleObserver`] to all seven schedules at once.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if the name is taken on
    /// any schedule.
    pub fn attach(
        &self,
        name: impl Into<String>,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Result<&Self, RegistrationError> {
        self.register::<(
            OnApplicationStart,
            OnApplicationStop,
            OnSessionCreate,
            OnSessionDestroy,
            OnAttributeAdded,
            OnAttributeRemoved,
            OnAttributeReplaced,
        ), _>(name, move |event: &ScopeEvent| match event {
            ScopeEvent::ApplicationStarted { name } => observer.application_started(name),
            ScopeEvent::ApplicationStopped { name, uptime } => {
                observer.application_stopped(name, *uptime);
            }
            ScopeEvent::SessionCreated { session_id } => observer.session_created(session_id),
            ScopeEvent::SessionDestroyed { session_id, reason } => {
                observer.session_destroyed(session_id, *reason);
            }
            ScopeEvent::AttributeAdded {
                session_id,
                key,
                value,
            } => observer.attribute_added(session_id, key, value),
            ScopeEvent::AttributeReplaced {
                session_id,
                key,
                old,
                new,
            } => observer.attribute_replaced(session_id, key, old, new),
            ScopeEvent::AttributeRemoved {
                session_id,
                key,
                value,
            } => observer.attribute_removed(session_id, key, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleId;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ApplicationObserver for Recorder {
        fn application_started(&self, name: &str) {
            self.record(format!("app_started:{name}"));
        }

        fn application_stopped(&self, name: &str, _uptime: Duration) {
            self.record(format!("app_stopped:{name}"));
        }
    }

    impl SessionObserver for Recorder {
        fn session_created(&self, session_id: &SessionId) {
            self.record(format!("created:{}", session_id.as_str()));
        }

        fn session_destroyed(&self, session_id: &SessionId, reason: DestroyReason) {
            self.record(format!("destroyed:{}:{:?}", session_id.as_str(), reason));
        }
    }

    impl SessionAttributeObserver for Recorder {
        fn attribute_added(&self, _session_id: &SessionId, key: &str, _value: &AttributeValue) {
            self.record(format!("added:{key}"));
        }

        fn attribute_replaced(
            &self,
            _session_id: &SessionId,
            key: &str,
            old: &AttributeValue,
            new: &AttributeValue,
        ) {
            self.record(format!(
                "replaced:{key}:{}->{}",
                old.downcast_ref::<i32>().copied().unwrap_or_default(),
                new.downcast_ref::<i32>().copied().unwrap_or_default()
            ));
        }

        fn attribute_removed(&self, _session_id: &SessionId, key: &str, _value: &AttributeValue) {
            self.record(format!("removed:{key}"));
        }
    }

    /// Observer implementing only the session capability, with one default
    /// method left as a no-op.
    struct CreateOnly {
        created: AtomicUsize,
    }

    impl SessionObserver for CreateOnly {
        fn session_created(&self, _session_id: &SessionId) {
            self.created.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn session_id() -> SessionId {
        SessionId::from_string("s-1")
    }

    #[test]
    fn attach_registers_all_seven_schedules() {
        let registry = ListenerRegistry::new();
        registry.attach("recorder", Arc::new(Recorder::default())).unwrap();

        for schedule in [
            ScheduleId::of::<OnApplicationStart>(),
            ScheduleId::of::<OnApplicationStop>(),
            ScheduleId::of::<OnSessionCreate>(),
            ScheduleId::of::<OnSessionDestroy>(),
            ScheduleId::of::<OnAttributeAdded>(),
            ScheduleId::of::<OnAttributeRemoved>(),
            ScheduleId::of::<OnAttributeReplaced>(),
        ] {
            assert_eq!(registry.listener_count(schedule), 1);
        }
    }

    #[test]
    fn attached_observer_receives_typed_calls() {
        let registry = ListenerRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry.attach("recorder", recorder.clone()).unwrap();

        let id = session_id();
        let events = [
            ScopeEvent::ApplicationStarted {
                name: "app".to_string(),
            },
            ScopeEvent::SessionCreated {
                session_id: id.clone(),
            },
            ScopeEvent::AttributeAdded {
                session_id: id.clone(),
                key: "n".to_string(),
                value: AttributeValue::new(1_i32),
            },
            ScopeEvent::AttributeReplaced {
                session_id: id.clone(),
                key: "n".to_string(),
                old: AttributeValue::new(1_i32),
                new: AttributeValue::new(2_i32),
            },
            ScopeEvent::AttributeRemoved {
                session_id: id.clone(),
                key: "n".to_string(),
                value: AttributeValue::new(2_i32),
            },
            ScopeEvent::SessionDestroyed {
                session_id: id,
                reason: DestroyReason::Invalidated,
            },
            ScopeEvent::ApplicationStopped {
                name: "app".to_string(),
                uptime: Duration::from_secs(1),
            },
        ];

        for event in &events {
            registry.invoke(event.schedule_id(), event);
        }

        assert_eq!(
            recorder.calls(),
            vec![
                "app_started:app",
                "created:s-1",
                "added:n",
                "replaced:n:1->2",
                "removed:n",
                "destroyed:s-1:Invalidated",
                "app_stopped:app",
            ]
        );
    }

    #[test]
    fn partial_capability_attachment() {
        let registry = ListenerRegistry::new();
        let observer = Arc::new(CreateOnly {
            created: AtomicUsize::new(0),
        });
        registry
            .attach_session_observer("create_only", observer.clone())
            .unwrap();

        // Only the session schedules are populated
        assert_eq!(registry.listener_count(ScheduleId::of::<OnSessionCreate>()), 1);
        assert_eq!(registry.listener_count(ScheduleId::of::<OnApplicationStart>()), 0);
        assert_eq!(registry.listener_count(ScheduleId::of::<OnAttributeAdded>()), 0);

        let created = ScopeEvent::SessionCreated {
            session_id: session_id(),
        };
        registry.invoke(created.schedule_id(), &created);
        assert_eq!(observer.created.load(Ordering::SeqCst), 1);

        // The default no-op body absorbs destroy notifications
        let destroyed = ScopeEvent::SessionDestroyed {
            session_id: session_id(),
            reason: DestroyReason::Expired,
        };
        registry.invoke(destroyed.schedule_id(), &destroyed);
        assert_eq!(observer.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn attach_duplicate_name_is_rejected() {
        let registry = ListenerRegistry::new();
        registry.attach("recorder", Arc::new(Recorder::default())).unwrap();

        let result = registry.attach("recorder", Arc::new(Recorder::default()));
        assert!(result.is_err());
    }
}
