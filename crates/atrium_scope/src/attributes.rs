//! Attribute storage for scope containers.
//!
//! This module provides [`AttributeValue`], a type-erased value that can be
//! stored under a string key, and [`Attributes`], the container both the
//! application scope and session scopes use for their state.
//!
//! # Value Model
//!
//! Attribute values are opaque to the container: any `Send + Sync + 'static`
//! type can be stored, and callers downcast on the way out. Values are
//! `Arc`-backed, so cloning one is a reference-count bump. This is what lets
//! mutation events carry the old and new values without copying user data.
//!
//! # Mutation Semantics
//!
//! [`Attributes::insert`] returns the previous value when the key was already
//! present, and [`Attributes::remove`] returns the removed value. The host
//! derives added/replaced/removed notifications from exactly these return
//! values; the container itself emits nothing.
//!
//! # Example
//!
//! ```
//! use atrium_scope::attributes::{AttributeValue, Attributes};
//!
//! let mut attrs = Attributes::new();
//!
//! let old = attrs.insert("user", AttributeValue::new("alice".to_string()));
//! assert!(old.is_none()); // fresh key
//!
//! let old = attrs.insert("user", AttributeValue::new("bob".to_string()));
//! assert_eq!(old.unwrap().downcast_ref::<String>().unwrap(), "alice");
//!
//! let removed = attrs.remove("user").unwrap();
//! assert_eq!(removed.downcast_ref::<String>().unwrap(), "bob");
//! ```

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// AttributeValue
// ─────────────────────────────────────────────────────────────────────────────

/// A type-erased attribute value.
///
/// Wraps an `Arc<dyn Any + Send + Sync>` together with the type name captured
/// at construction, so diagnostics can report what a value actually holds.
/// Cloning is cheap (reference count bump only).
#[derive(Clone)]
pub struct AttributeValue {
    /// The erased value.
    inner: Arc<dyn Any + Send + Sync>,
    /// Type name captured at construction, for diagnostics.
    type_name: &'static str,
}

impl AttributeValue {
    /// Wraps a value for storage in an [`Attributes`] container.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// Returns `true` if the stored value is of type `T`.
    #[must_use]
    pub fn is<T: Send + Sync + 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Returns a reference to the stored value if it is of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns the type name of the stored value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeValue")
            .field("type", &self.type_name)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Attributes
// ─────────────────────────────────────────────────────────────────────────────

/// String-keyed attribute container used by scope objects.
///
/// The container is deliberately event-free: the scope host observes the
/// return values of [`insert`](Self::insert) and [`remove`](Self::remove) to
/// decide which notification (added, replaced, removed) to deliver.
#[derive(Default)]
pub struct Attributes {
    entries: HashMap<String, AttributeValue>,
}

impl Attributes {
    /// Creates an empty attribute container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts or overwrites an attribute.
    ///
    /// Returns the previous value when the key was already present — the
    /// caller distinguishes an insertion (`None`) from a replacement
    /// (`Some(old)`).
    pub fn insert(&mut self, key: impl Into<String>, value: AttributeValue) -> Option<AttributeValue> {
        self.entries.insert(key.into(), value)
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    /// Returns the value stored under `key` downcast to `T`.
    ///
    /// Returns `None` when the key is absent or the value is not a `T`.
    #[must_use]
    pub fn get_as<T: Send + Sync + 'static>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(AttributeValue::downcast_ref)
    }

    /// Removes the attribute stored under `key` and returns it.
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.entries.remove(key)
    }

    /// Returns `true` if an attribute is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns an iterator over the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of stored attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no attributes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all attributes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut attrs = Attributes::new();
        attrs.insert("count", AttributeValue::new(42_i32));

        let value = attrs.get("count").unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
    }

    #[test]
    fn insert_fresh_key_returns_none() {
        let mut attrs = Attributes::new();
        assert!(attrs.insert("user", AttributeValue::new("alice".to_string())).is_none());
    }

    #[test]
    fn insert_replaces_and_returns_old() {
        let mut attrs = Attributes::new();
        attrs.insert("user", AttributeValue::new("alice".to_string()));

        let old = attrs.insert("user", AttributeValue::new("bob".to_string()));
        assert_eq!(old.unwrap().downcast_ref::<String>().unwrap(), "alice");
        assert_eq!(attrs.get_as::<String>("user").unwrap(), "bob");
    }

    #[test]
    fn remove_returns_value() {
        let mut attrs = Attributes::new();
        attrs.insert("user", AttributeValue::new("alice".to_string()));

        let removed = attrs.remove("user").unwrap();
        assert_eq!(removed.downcast_ref::<String>().unwrap(), "alice");
        assert!(attrs.remove("user").is_none());
    }

    #[test]
    fn get_as_wrong_type_returns_none() {
        let mut attrs = Attributes::new();
        attrs.insert("count", AttributeValue::new(42_i32));

        assert!(attrs.get_as::<String>("count").is_none());
        assert_eq!(attrs.get_as::<i32>("count"), Some(&42));
    }

    #[test]
    fn value_type_name_and_is() {
        let value = AttributeValue::new(3.5_f64);
        assert!(value.is::<f64>());
        assert!(!value.is::<f32>());
        assert!(value.type_name().contains("f64"));
    }

    #[test]
    fn value_clone_shares_storage() {
        let value = AttributeValue::new(vec![1, 2, 3]);
        let clone = value.clone();
        assert_eq!(
            clone.downcast_ref::<Vec<i32>>().unwrap(),
            value.downcast_ref::<Vec<i32>>().unwrap()
        );
    }

    #[test]
    fn keys_len_and_clear() {
        let mut attrs = Attributes::new();
        assert!(attrs.is_empty());

        attrs.insert("a", AttributeValue::new(1_i32));
        attrs.insert("b", AttributeValue::new(2_i32));
        assert_eq!(attrs.len(), 2);
        assert!(attrs.contains_key("a"));

        let mut keys: Vec<&str> = attrs.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);

        attrs.clear();
        assert!(attrs.is_empty());
    }
}
