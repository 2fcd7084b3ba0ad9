//! Run status and the error returned by a failed invocation.

use std::fmt;

use thiserror::Error;

use crate::error::GraphError;
use crate::state::State;

/// Lifecycle of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Running,
    Completed,
    /// A node, router or merge failed.
    Failed,
    /// The step guard tripped.
    Aborted,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Ready => "ready",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// A failed invocation: the error plus the last consistent merged state.
///
/// `state` never contains a half-applied update. `steps` counts node runs that
/// were merged before the failure.
#[derive(Debug, Error)]
#[error("graph run {status} after {steps} step(s): {error}")]
pub struct InvokeError {
    pub error: GraphError,
    pub state: State,
    pub status: RunStatus,
    pub steps: usize,
}

impl InvokeError {
    pub fn kind(&self) -> &GraphError {
        &self.error
    }

    pub fn into_state(self) -> State {
        self.state
    }
}
