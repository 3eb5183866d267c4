//! Per-client session scope.

use core::fmt;
use core::time::Duration;
use std::sync::Arc;
use std::time::Instant;

use crate::attributes::Attributes;

/// Unique identifier for a session scope.
///
/// Session IDs are generated with nanoid, so hosts never coordinate on
/// allocation. Internally an `Arc<str>` for cheap cloning (reference count
/// bump only). The identifier is opaque: nothing about the owning client is
/// derivable from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// Creates a new session ID with a unique nanoid.
    #[must_use]
    pub fn new() -> Self {
        Self(nanoid::nanoid!().into())
    }

    /// Creates a session ID from a specific string value.
    ///
    /// This is primarily useful for testing or when restoring an external
    /// identifier.
    #[must_use]
    pub fn from_string(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session_{}", self.0)
    }
}

/// A per-client state container keyed by a [`SessionId`].
///
/// Sessions are created and destroyed exclusively by the scope host; this
/// type only holds state and access bookkeeping. `last_accessed` drives idle
/// expiry and is refreshed by every attribute operation.
pub struct SessionScope {
    id: SessionId,
    attributes: Attributes,
    created_at: Instant,
    last_accessed: Instant,
}

impl SessionScope {
    /// Creates a fresh session scope with the given creation instant.
    #[must_use]
    pub fn new(id: SessionId, now: Instant) -> Self {
        Self {
            id,
            attributes: Attributes::new(),
            created_at: now,
            last_accessed: now,
        }
    }

    /// Returns the session's identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the session's attribute container.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns a mutable reference to the session's attribute container.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Returns the instant the session was created.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns the instant of the last access.
    #[must_use]
    pub fn last_accessed(&self) -> Instant {
        self.last_accessed
    }

    /// Refreshes the last-accessed instant.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
    }

    /// Returns how long the session has been idle as of `now`.
    #[must_use]
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_accessed)
    }
}

impl fmt::Debug for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionScope")
            .field("id", &self.id)
            .field("attributes", &self.attributes.len())
            .finish()
    }
}
