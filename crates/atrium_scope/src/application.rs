//! Process-wide application scope.

use core::fmt;
use std::time::Instant;

use crate::attributes::Attributes;

/// Process-wide state container with a start-to-shutdown lifecycle.
///
/// The application scope is an explicitly passed context object, never an
/// implicit global: the scope host creates exactly one at start and drops it
/// at shutdown. State shared across all client interactions lives in its
/// attribute container.
pub struct ApplicationScope {
    name: String,
    attributes: Attributes,
    started_at: Instant,
}

impl ApplicationScope {
    /// Creates the application scope with the given start instant.
    #[must_use]
    pub fn new(name: impl Into<String>, now: Instant) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            started_at: now,
        }
    }

    /// Returns the application's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the application's attribute container.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns a mutable reference to the application's attribute container.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Returns the instant the scope was created.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

impl fmt::Debug for ApplicationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationScope")
            .field("name", &self.name)
            .field("attributes", &self.attributes.len())
            .finish()
    }
}
