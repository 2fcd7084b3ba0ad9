//! Partial state updates returned by nodes.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field write inside a [`StateUpdate`].
///
/// A field missing from the update is left untouched; `Set` goes through the
/// channel's reducer; `Clear` removes the field regardless of reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Write {
    Set(Value),
    Clear,
}

/// Partial update: only the fields a node wants to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateUpdate {
    writes: BTreeMap<String, Write>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the update with a `Set` write for `field`.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.writes.insert(field.into(), Write::Set(value.into()));
        self
    }

    /// Returns the update with a `Clear` write for `field`.
    pub fn clear(mut self, field: impl Into<String>) -> Self {
        self.writes.insert(field.into(), Write::Clear);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Write> {
        self.writes.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.writes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl IntoIterator for StateUpdate {
    type Item = (String, Write);
    type IntoIter = btree_map::IntoIter<String, Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}
