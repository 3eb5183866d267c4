//! Schedule markers for scope lifecycle events.
//!
//! These marker types identify the hook points a listener can register on.
//! Use them with [`ScheduleId::of::<T>()`](ScheduleId::of) for low-level
//! registration, or with the type-safe
//! [`register::<OnSessionCreate>`](crate::registry::ListenerRegistry::register)
//! method.
//!
//! # Pure Markers
//!
//! Schedule markers are pure marker types implementing the [`Schedule`]
//! trait. Event data is provided via the unified
//! [`ScopeEvent`](crate::events::ScopeEvent) enum, which all listeners
//! receive.

use core::any::TypeId;
use variadics_please::all_tuples;

/// Identifier for a lifecycle schedule, derived from a marker type.
///
/// A `ScheduleId` wraps a `TypeId` so that any `'static` type can serve as a
/// schedule marker. The cached type name is kept for diagnostics and error
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ScheduleId {
    /// Creates a `ScheduleId` for the given schedule marker type.
    #[must_use]
    pub fn of<S: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name: core::any::type_name::<S>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Schedule Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Marker trait for schedule types.
///
/// The trait carries no methods; it exists so that [`IntoScheduleIds`] can
/// accept schedule types by trait bound. Note that [`ScheduleId::of`] accepts
/// any `'static` type and does not require this trait — `Schedule` is a
/// convention, not a hard constraint.
pub trait Schedule: 'static {}

// ─────────────────────────────────────────────────────────────────────────────
// IntoScheduleIds Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for types that can be converted into a list of schedule IDs.
///
/// Implemented for single schedules and tuples of schedules, enabling
/// registration of one listener on several hook points at once.
pub trait IntoScheduleIds {
    /// Returns the schedule IDs for this type.
    fn schedule_ids() -> Vec<ScheduleId>;
}

/// Single schedule implements `IntoScheduleIds`.
impl<S: Schedule> IntoScheduleIds for S {
    fn schedule_ids() -> Vec<ScheduleId> {
        vec![ScheduleId::of::<S>()]
    }
}

/// Macro to implement `IntoScheduleIds` for tuples of schedules.
macro_rules! impl_into_schedule_ids_for_tuple {
    ($($S:ident),*) => {
        impl<$($S: Schedule),*> IntoScheduleIds for ($($S,)*) {
            fn schedule_ids() -> Vec<ScheduleId> {
                vec![$(ScheduleId::of::<$S>()),*]
            }
        }
    };
}

// Generate implementations for tuples from 2 to 16 elements
all_tuples!(impl_into_schedule_ids_for_tuple, 2, 16, S);

// ─────────────────────────────────────────────────────────────────────────────
// Application Schedules
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for listeners called after the application scope is created.
///
/// Fires once, before any session can be created.
///
/// Event data: [`ScopeEvent::ApplicationStarted`](crate::events::ScopeEvent::ApplicationStarted)
pub struct OnApplicationStart;
impl Schedule for OnApplicationStart {}

/// Marker type for listeners called when the application scope is about to
/// be destroyed.
///
/// Fires once, after the destruction events of every session still active at
/// shutdown.
///
/// Event data: [`ScopeEvent::ApplicationStopped`](crate::events::ScopeEvent::ApplicationStopped)
pub struct OnApplicationStop;
impl Schedule for OnApplicationStop {}

// ─────────────────────────────────────────────────────────────────────────────
// Session Schedules
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for listeners called after a session scope is created.
///
/// Fires before the session's ID is returned to any caller.
///
/// Event data: [`ScopeEvent::SessionCreated`](crate::events::ScopeEvent::SessionCreated)
pub struct OnSessionCreate;
impl Schedule for OnSessionCreate {}

/// Marker type for listeners called when a session scope is destroyed,
/// expired, or shut down with the application.
///
/// Fires before the session's memory is reclaimed.
///
/// Event data: [`ScopeEvent::SessionDestroyed`](crate::events::ScopeEvent::SessionDestroyed)
pub struct OnSessionDestroy;
impl Schedule for OnSessionDestroy {}

// ─────────────────────────────────────────────────────────────────────────────
// Session-Attribute Schedules
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for listeners called when a new key is inserted into a
/// session scope.
///
/// Event data: [`ScopeEvent::AttributeAdded`](crate::events::ScopeEvent::AttributeAdded)
pub struct OnAttributeAdded;
impl Schedule for OnAttributeAdded {}

/// Marker type for listeners called when a key is deleted from a session
/// scope.
///
/// Event data: [`ScopeEvent::AttributeRemoved`](crate::events::ScopeEvent::AttributeRemoved)
pub struct OnAttributeRemoved;
impl Schedule for OnAttributeRemoved {}

/// Marker type for listeners called when an existing key's value is
/// overwritten in a session scope.
///
/// Event data: [`ScopeEvent::AttributeReplaced`](crate::events::ScopeEvent::AttributeReplaced)
pub struct OnAttributeReplaced;
impl Schedule for OnAttributeReplaced {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_id_equality() {
        let id1 = ScheduleId::of::<OnSessionCreate>();
        let id2 = ScheduleId::of::<OnSessionCreate>();
        let id3 = ScheduleId::of::<OnSessionDestroy>();

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn schedule_id_type_name() {
        let id = ScheduleId::of::<OnAttributeAdded>();
        assert!(id.type_name().contains("OnAttributeAdded"));
    }

    #[test]
    fn into_schedule_ids_single() {
        let ids = OnApplicationStart::schedule_ids();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0], ScheduleId::of::<OnApplicationStart>());
    }

    #[test]
    fn into_schedule_ids_tuple() {
        let ids = <(OnSessionCreate, OnSessionDestroy, OnAttributeAdded)>::schedule_ids();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], ScheduleId::of::<OnSessionCreate>());
        assert_eq!(ids[1], ScheduleId::of::<OnSessionDestroy>());
        assert_eq!(ids[2], ScheduleId::of::<OnAttributeAdded>());
    }
}
