//! Node middleware: wraps every node run of a compiled graph.
//!
//! Passed at compile time (`compile_with_middleware` or `with_middleware`).
//! [`LoggingNodeMiddleware`] logs enter/exit of each node through `tracing`.

use std::time::Instant;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::NodeError;
use crate::state::{State, StateUpdate};

/// Future of one node run, as handed to middleware.
pub type NodeFuture = BoxFuture<'static, Result<StateUpdate, NodeError>>;

/// The wrapped node run. Call it at most once with the state to pass on.
pub type NodeRunFn = Box<dyn FnOnce(State) -> NodeFuture + Send>;

/// Around-advice for node execution.
///
/// Implementations must call `inner` to actually run the node (or return an error
/// instead). They must return a single update; the executor merges it as usual.
#[async_trait]
pub trait NodeMiddleware: Send + Sync {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        inner: NodeRunFn,
    ) -> Result<StateUpdate, NodeError>;
}

/// Middleware that logs node enter/exit (with elapsed time and written fields).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNodeMiddleware;

#[async_trait]
impl NodeMiddleware for LoggingNodeMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        inner: NodeRunFn,
    ) -> Result<StateUpdate, NodeError> {
        tracing::info!(node_id, fields = state.len(), "node enter");
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(update) => {
                let written: Vec<&str> = update.fields().collect();
                tracing::info!(node_id, elapsed_ms, ?written, "node exit");
            }
            Err(error) => tracing::warn!(node_id, elapsed_ms, %error, "node exit with error"),
        }
        result
    }
}
