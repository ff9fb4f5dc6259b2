//! Change tracking for entries.
//!
//! [`PendingChanges`] is the diff an [`Entry`] sends on its next
//! [`save`](Entry::save). [`NestedValue`] gives write access to the keys of
//! an object-valued field (such as a subscriber's `custom_fields`) while
//! keeping that diff accurate: every write re-assigns the whole field on the
//! owning entry.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut custom_fields = subscriber.nested("custom_fields")?;
//! custom_fields.set("Color", "Red")?;
//!
//! assert_eq!(subscriber.pending_changes()["custom_fields"]["Color"], "Red");
//! subscriber.save().await?;
//! ```

use std::ops::Deref;

use serde_json::{Map, Value};

use crate::clients::{HttpClient, Transport};
use crate::rest::entry::Entry;
use crate::rest::ResourceError;

/// Fields written since the last save or reload, with their new values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingChanges(Map<String, Value>);

impl PendingChanges {
    /// Creates an empty diff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new value for a field, replacing any earlier one.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Forgets every recorded change.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Copies the diff into a request body.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        self.0.clone()
    }
}

impl Deref for PendingChanges {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Write access to the keys of one object-valued field of an entry.
///
/// Holds the entry mutably for as long as it lives.
#[derive(Debug)]
pub struct NestedValue<'a, A: Transport = HttpClient> {
    entry: &'a mut Entry<A>,
    field: String,
}

impl<'a, A: Transport> NestedValue<'a, A> {
    pub(crate) fn new(entry: &'a mut Entry<A>, field: impl Into<String>) -> Self {
        Self {
            entry,
            field: field.into(),
        }
    }

    /// Name of the wrapped field.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field
    }

    /// The current object, including unsaved writes.
    #[must_use]
    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        self.entry.data().get(&self.field).and_then(Value::as_object)
    }

    /// Reads one key of the object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Returns `true` if the object has `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Writes one key and records the whole field as changed on the entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotAnObject`] if the field no longer holds an
    /// object.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<(), ResourceError> {
        let mut object = self
            .as_map()
            .cloned()
            .ok_or_else(|| ResourceError::NotAnObject {
                name: self.field.clone(),
            })?;
        object.insert(key.into(), value.into());
        self.entry.set(&self.field, Value::Object(object))
    }
}
