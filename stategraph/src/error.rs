//! Node and graph run error types.
//!
//! `NodeError` is what a node body returns when its own work fails. `GraphError`
//! is the set of run-time failure kinds the executor can stop on; it wraps a
//! `NodeError` unmodified when a node fails.

use thiserror::Error;

/// Error returned by a node's transform.
///
/// The executor never inspects or retries it; it is carried inside
/// [`GraphError::NodeExecution`] together with the failing node's name.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Execution failed with a message (e.g. model call failed, tool error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Any other error raised by the node body.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl NodeError {
    /// Wraps an arbitrary error as the node's failure cause.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }
}

/// Run-time error kinds of a graph invocation.
///
/// Every kind aborts the invocation immediately. The caller receives it inside
/// [`InvokeError`](crate::graph::InvokeError) together with the last consistent state.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A state update (or the initial state) names a field with no registered channel.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// Routing reached a node that has no outgoing edge.
    #[error("node has no outgoing edge: {0}")]
    DanglingNode(String),

    /// A node id was resolved as a successor but is not registered.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A conditional router returned a label absent from its label table.
    #[error("router on {node} returned unmapped label {label}")]
    UnroutableLabel { node: String, label: String },

    /// A node's transform failed. The cause is kept unmodified.
    #[error("node {node} failed: {source}")]
    NodeExecution {
        node: String,
        #[source]
        source: NodeError,
    },

    /// The step guard tripped before the run reached END.
    #[error("cycle limit exceeded: {limit} steps without reaching END")]
    CycleLimitExceeded { limit: usize },

    /// A merged or initial value does not match its channel's field kind.
    #[error("invalid value for channel {channel}: {reason}")]
    InvalidValue { channel: String, reason: String },
}
