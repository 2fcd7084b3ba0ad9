//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the node, edge and channel declarations
//! do not form a closed, unambiguous graph.

use thiserror::Error;

/// Error when compiling a state graph (unknown node in an edge, missing entry, ...).
///
/// Validation ensures every edge endpoint (except START/END) is a registered node,
/// every node has exactly one outgoing edge, and declared writes name registered channels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// An edge references a node id that was not registered via `add_node`.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge leaves START.
    #[error("graph has no entry point: add an edge from START or call set_entry_point")]
    MissingEntry,

    /// A node id was registered more than once.
    #[error("duplicate node: {0}")]
    DuplicateNode(String),

    /// A state field was given a channel more than once.
    #[error("duplicate channel: {0}")]
    DuplicateChannel(String),

    /// Two edges of the same kind leave one source.
    #[error("more than one edge from {0}")]
    DuplicateEdge(String),

    /// Both a static and a conditional edge leave one source.
    #[error("{0} has both a static and a conditional edge")]
    ConflictingEdges(String),

    /// A registered node has no outgoing edge.
    #[error("node has no outgoing edge: {0}")]
    DanglingNode(String),

    /// A node declares a write to a field with no registered channel.
    #[error("node {node} writes unknown channel {channel}")]
    UnknownChannel { node: String, channel: String },

    /// A variant of an enumerable label type is missing from a router's table.
    #[error("router on {node} does not map label {label}")]
    UnmappedLabel { node: String, label: String },
}
