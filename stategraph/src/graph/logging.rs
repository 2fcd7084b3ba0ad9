//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for graph start/complete/error, node execution and
//! state updates. The crate never installs a subscriber.

use super::edge::Target;
use super::invoke_error::{InvokeError, RunStatus};

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id, step, "Starting node execution");
}

/// Log node execution completion with the resolved next hop.
pub fn log_node_complete(node_id: &str, next: &Target) {
    tracing::debug!(node_id, next = %next, "Node execution complete");
}

/// Log state update after merging a node's output.
pub fn log_state_update(node_id: &str, fields: &[&str]) {
    tracing::debug!(node_id, ?fields, "State updated");
}

/// Log graph execution start.
pub fn log_graph_start(max_steps: usize) {
    tracing::info!(max_steps, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize, status: RunStatus) {
    tracing::info!(steps, %status, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &InvokeError) {
    tracing::error!(status = %error.status, steps = error.steps, error = %error.error, "Graph execution error");
}
