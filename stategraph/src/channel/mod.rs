//! Channels: per-field schema and merge rules for the shared state.
//!
//! Register one [`Channel`] per state field in a [`ChannelRegistry`] at build time.
//! At run time [`ChannelRegistry::merge_all`] folds a node's [`StateUpdate`] into
//! the state. The registry is read-only once the graph is compiled.

mod reducer;

pub use reducer::{reducer_fn, Add, Append, FnReducer, LastValue, Reducer, ReducerError};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::GraphError;
use crate::state::{State, StateUpdate, Write};

/// Semantic type of a state field. Checked after every merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// JSON array.
    Sequence,
    /// Any non-null JSON value.
    Scalar,
    /// JSON integer.
    Counter,
    /// JSON string or null.
    OptionalString,
    /// No constraint.
    Any,
}

impl FieldKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Sequence => value.is_array(),
            FieldKind::Scalar => !value.is_null(),
            FieldKind::Counter => value.is_i64() || value.is_u64(),
            FieldKind::OptionalString => value.is_string() || value.is_null(),
            FieldKind::Any => true,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Sequence => "sequence",
            FieldKind::Scalar => "scalar",
            FieldKind::Counter => "counter",
            FieldKind::OptionalString => "optional string",
            FieldKind::Any => "any",
        };
        f.write_str(s)
    }
}

/// A state field's kind plus its reducer.
#[derive(Clone)]
pub struct Channel {
    kind: FieldKind,
    reducer: Arc<dyn Reducer>,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("kind", &self.kind)
            .field("reducer", &"<reducer>")
            .finish()
    }
}

impl Channel {
    /// Channel with the default [`LastValue`] reducer.
    pub fn new(kind: FieldKind) -> Self {
        Self::with_reducer(kind, LastValue)
    }

    pub fn with_reducer(kind: FieldKind, reducer: impl Reducer + 'static) -> Self {
        Self {
            kind,
            reducer: Arc::new(reducer),
        }
    }

    /// Scalar field, last value wins.
    pub fn scalar() -> Self {
        Self::new(FieldKind::Scalar)
    }

    /// Optional string field, last value wins.
    pub fn optional_string() -> Self {
        Self::new(FieldKind::OptionalString)
    }

    /// Append-only sequence.
    pub fn sequence() -> Self {
        Self::with_reducer(FieldKind::Sequence, Append)
    }

    /// Integer counter; writes are increments.
    pub fn counter() -> Self {
        Self::with_reducer(FieldKind::Counter, Add)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Merges one incoming value into `previous` and checks the result against the kind.
    pub fn merge(
        &self,
        field: &str,
        previous: Option<&Value>,
        incoming: Value,
    ) -> Result<Option<Value>, GraphError> {
        let merged = self
            .reducer
            .reduce(previous, incoming)
            .map_err(|e| GraphError::InvalidValue {
                channel: field.to_string(),
                reason: e.0,
            })?;
        if let Some(v) = &merged {
            self.check(field, v)?;
        }
        Ok(merged)
    }

    fn check(&self, field: &str, value: &Value) -> Result<(), GraphError> {
        if self.kind.accepts(value) {
            Ok(())
        } else {
            Err(GraphError::InvalidValue {
                channel: field.to_string(),
                reason: format!("expected {}, got {}", self.kind, value),
            })
        }
    }
}

/// Field name → channel. Fixed at build time.
#[derive(Clone, Default, Debug)]
pub struct ChannelRegistry {
    channels: HashMap<String, Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `field`. Replaces an earlier registration of the same field.
    pub fn register(&mut self, field: impl Into<String>, channel: Channel) -> &mut Self {
        self.channels.insert(field.into(), channel);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Channel> {
        self.channels.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.channels.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Checks an initial state: registered fields must be of the declared kind.
    ///
    /// Fields without a channel are carried through untouched; only a node update
    /// naming them fails with `UnknownChannel`.
    pub fn check_state(&self, state: &State) -> Result<(), GraphError> {
        for (field, value) in state.iter() {
            if let Some(channel) = self.get(field) {
                channel.check(field, value)?;
            }
        }
        Ok(())
    }

    /// Folds `update` into `state`.
    ///
    /// All-or-nothing: unknown fields and reducer/kind failures are detected before
    /// any field is written, so on error `state` is unchanged. Fields absent from
    /// `update` are left as they are.
    pub fn merge_all(&self, state: &mut State, update: StateUpdate) -> Result<(), GraphError> {
        if let Some(unknown) = update.fields().find(|f| !self.contains(f)) {
            return Err(GraphError::UnknownChannel(unknown.to_string()));
        }

        let mut merged = Vec::with_capacity(update.len());
        for (field, write) in update {
            let value = match write {
                Write::Clear => None,
                Write::Set(incoming) => {
                    let channel = self
                        .get(&field)
                        .ok_or_else(|| GraphError::UnknownChannel(field.clone()))?;
                    channel.merge(&field, state.get(&field), incoming)?
                }
            };
            merged.push((field, value));
        }

        for (field, value) in merged {
            match value {
                Some(v) => {
                    state.insert(field, v);
                }
                None => {
                    state.remove(&field);
                }
            }
        }
        Ok(())
    }
}
