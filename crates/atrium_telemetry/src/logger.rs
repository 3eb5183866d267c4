//! Event-logging observer.
//!
//! [`EventLogger`] is the canonical instrumentation for the lifecycle hook
//! points: it implements all three observer capabilities and logs every
//! event through `tracing`, at a level matched to the event's scope —
//! application transitions at info, session transitions at debug, attribute
//! mutations at trace.

use core::time::Duration;
use std::sync::Arc;

use atrium_lifecycle::events::DestroyReason;
use atrium_lifecycle::observer::{
    ApplicationObserver, SessionAttributeObserver, SessionObserver,
};
use atrium_lifecycle::registry::{ListenerRegistry, RegistrationError};
use atrium_scope::attributes::AttributeValue;
use atrium_scope::session::SessionId;

/// Observer that logs every lifecycle event.
///
/// # Example
///
/// ```
/// use atrium_lifecycle::host::ScopeHost;
/// use atrium_telemetry::EventLogger;
///
/// let host = ScopeHost::new("demo");
/// EventLogger::attach_to(host.listeners()).unwrap();
///
/// host.start().unwrap();
/// let session = host.create_session().unwrap();
/// host.put_attribute(&session, "user", "alice".to_string()).unwrap();
/// host.shutdown().unwrap();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct EventLogger;

impl EventLogger {
    /// Registration name used by [`attach_to`](Self::attach_to).
    pub const NAME: &'static str = "telemetry:event_logger";

    /// Attaches an `EventLogger` to every schedule of the given registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if an event logger is
    /// already attached.
    pub fn attach_to(registry: &ListenerRegistry) -> Result<(), RegistrationError> {
        registry.attach(Self::NAME, Arc::new(Self))?;
        Ok(())
    }
}

impl ApplicationObserver for EventLogger {
    fn application_started(&self, name: &str) {
        tracing::info!(name, "application started");
    }

    fn application_stopped(&self, name: &str, uptime: Duration) {
        tracing::info!(name, ?uptime, "application stopped");
    }
}

impl SessionObserver for EventLogger {
    fn session_created(&self, session_id: &SessionId) {
        tracing::debug!(%session_id, "session created");
    }

    fn session_destroyed(&self, session_id: &SessionId, reason: DestroyReason) {
        tracing::debug!(%session_id, ?reason, "session destroyed");
    }
}

impl SessionAttributeObserver for EventLogger {
    fn attribute_added(&self, session_id: &SessionId, key: &str, value: &AttributeValue) {
        tracing::trace!(%session_id, key, value_type = value.type_name(), "attribute added");
    }

    fn attribute_replaced(
        &self,
        session_id: &SessionId,
        key: &str,
        old: &AttributeValue,
        new: &AttributeValue,
    ) {
        tracing::trace!(
            %session_id,
            key,
            old_type = old.type_name(),
            new_type = new.type_name(),
            "attribute replaced"
        );
    }

    fn attribute_removed(&self, session_id: &SessionId, key: &str, value: &AttributeValue) {
        tracing::trace!(%session_id, key, value_type = value.type_name(), "attribute removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_lifecycle::host::ScopeHost;
    use atrium_lifecycle::schedule::{
        OnApplicationStart, OnApplicationStop, OnAttributeAdded, OnAttributeRemoved,
        OnAttributeReplaced, OnSessionCreate, OnSessionDestroy, ScheduleId,
    };

    #[test]
    fn attach_to_covers_every_schedule() {
        let registry = ListenerRegistry::new();
        EventLogger::attach_to(&registry).unwrap();

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
    fn attach_to_twice_is_rejected() {
        let registry = ListenerRegistry::new();
        EventLogger::attach_to(&registry).unwrap();
        assert!(EventLogger::attach_to(&registry).is_err());
    }

    #[test]
    fn logger_survives_a_full_lifecycle() {
        let host = ScopeHost::new("app");
        EventLogger::attach_to(host.listeners()).unwrap();

        host.start().unwrap();
        let session = host.create_session().unwrap();
        host.put_attribute(&session, "user", "alice".to_string()).unwrap();
        host.put_attribute(&session, "user", "bob".to_string()).unwrap();
        host.remove_attribute(&session, "user").unwrap();
        host.destroy_session(&session).unwrap();
        host.shutdown().unwrap();
    }
}
