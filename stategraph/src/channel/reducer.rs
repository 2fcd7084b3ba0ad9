//! Reducers: how a channel merges an incoming write into the previous value.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};
use thiserror::Error;

/// A reducer could not merge the incoming value (e.g. adding a string to a counter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ReducerError(pub String);

/// Binary merge `reduce(previous, incoming) -> merged`.
///
/// Must be pure and defined for `previous == None` (first write). Returning
/// `Ok(None)` leaves the field absent.
pub trait Reducer: Send + Sync {
    fn reduce(&self, previous: Option<&Value>, incoming: Value) -> Result<Option<Value>, ReducerError>;
}

/// Replace if incoming is defined, else keep previous. A `null` write counts as undefined.
///
/// Default reducer for channels registered without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastValue;

impl Reducer for LastValue {
    fn reduce(&self, previous: Option<&Value>, incoming: Value) -> Result<Option<Value>, ReducerError> {
        if incoming.is_null() {
            Ok(previous.cloned())
        } else {
            Ok(Some(incoming))
        }
    }
}

/// Append-only sequence. An incoming array is concatenated, any other non-null value
/// is pushed as one element.
#[derive(Debug, Clone, Copy, Default)]
pub struct Append;

impl Reducer for Append {
    fn reduce(&self, previous: Option<&Value>, incoming: Value) -> Result<Option<Value>, ReducerError> {
        if incoming.is_null() {
            return Ok(previous.cloned());
        }
        let mut items = match previous {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        };
        match incoming {
            Value::Array(more) => items.extend(more),
            other => items.push(other),
        }
        Ok(Some(Value::Array(items)))
    }
}

/// Numeric sum starting from 0. Integers stay integers unless they overflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl Reducer for Add {
    fn reduce(&self, previous: Option<&Value>, incoming: Value) -> Result<Option<Value>, ReducerError> {
        if incoming.is_null() {
            return Ok(previous.cloned());
        }
        let prev = match previous {
            None | Some(Value::Null) => Number::from(0),
            Some(Value::Number(n)) => n.clone(),
            Some(other) => {
                return Err(ReducerError(format!("cannot add to non-number {}", other)))
            }
        };
        let next = match &incoming {
            Value::Number(n) => n,
            other => return Err(ReducerError(format!("cannot add non-number {}", other))),
        };
        if let (Some(a), Some(b)) = (prev.as_i64(), next.as_i64()) {
            if let Some(sum) = a.checked_add(b) {
                return Ok(Some(Value::from(sum)));
            }
        }
        let sum = prev.as_f64().unwrap_or(0.0) + next.as_f64().unwrap_or(0.0);
        Number::from_f64(sum)
            .map(|n| Some(Value::Number(n)))
            .ok_or_else(|| ReducerError(format!("sum is not a finite number: {}", sum)))
    }
}

/// Reducer backed by a closure `(previous, incoming) -> merged`.
#[derive(Clone)]
pub struct FnReducer {
    f: Arc<dyn Fn(Option<&Value>, Value) -> Value + Send + Sync>,
}

impl fmt::Debug for FnReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnReducer(<function>)")
    }
}

impl Reducer for FnReducer {
    fn reduce(&self, previous: Option<&Value>, incoming: Value) -> Result<Option<Value>, ReducerError> {
        Ok(Some((self.f)(previous, incoming)))
    }
}

/// Wraps a pure closure as a [`Reducer`].
pub fn reducer_fn<F>(f: F) -> FnReducer
where
    F: Fn(Option<&Value>, Value) -> Value + Send + Sync + 'static,
{
    FnReducer { f: Arc::new(f) }
}
