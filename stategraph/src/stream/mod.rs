//! Streaming types for graph runs.
//!
//! Defines stream modes and events emitted by `CompiledStateGraph::stream`.

use crate::graph::InvokeError;
use crate::state::{State, StateUpdate};

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit full state after each node's update is merged.
    Values,
    /// Emit each node's partial update with the node id.
    Updates,
}

/// Event emitted while running a graph.
///
/// A successful run ends when the stream ends. A failed run always ends with one
/// `Error` event, whatever modes were selected.
#[derive(Debug)]
pub enum StreamEvent {
    /// Full state snapshot after a node's update was merged.
    Values(State),
    /// The update a node returned (already merged when this is sent).
    Updates { node_id: String, update: StateUpdate },
    /// The run failed; carries the last consistent state.
    Error(InvokeError),
}
