//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds the channel registry, node registry, edge
//! table and step guard behind one `Arc`, so clones are cheap and concurrent
//! invocations share it read-only.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::channel::ChannelRegistry;
use crate::error::GraphError;
use crate::state::State;
use crate::stream::{StreamEvent, StreamMode};

use super::config::RunConfig;
use super::edge::{EdgeTable, Source, Target, START};
use super::invoke_error::{InvokeError, RunStatus};
use super::logging;
use super::node::NodeRegistry;
use super::node_middleware::NodeMiddleware;

pub(super) struct GraphParts {
    pub(super) channels: ChannelRegistry,
    pub(super) nodes: NodeRegistry,
    pub(super) edges: EdgeTable,
    pub(super) max_steps: usize,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware>>,
}

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Each invocation owns its state and its run machine (current node, step count);
/// nothing per-run lives in the graph, so one compiled graph can serve many
/// concurrent invocations.
///
/// There is no mid-step cancellation: the step guard is the only bound on a run.
/// Callers needing cancellation check their own flag inside node bodies.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(super) inner: Arc<GraphParts>,
}

/// Per-invocation machine.
struct Run {
    state: State,
    steps: usize,
    status: RunStatus,
}

impl Run {
    fn new(state: State) -> Self {
        Self {
            state,
            steps: 0,
            status: RunStatus::Ready,
        }
    }

    fn start(&mut self) {
        self.status = RunStatus::Running;
    }

    fn stop(mut self, status: RunStatus, error: GraphError) -> InvokeError {
        self.status = status;
        let err = InvokeError {
            error,
            state: self.state,
            status: self.status,
            steps: self.steps,
        };
        logging::log_graph_error(&err);
        err
    }

    fn fail(self, error: GraphError) -> InvokeError {
        self.stop(RunStatus::Failed, error)
    }

    fn abort(self, error: GraphError) -> InvokeError {
        self.stop(RunStatus::Aborted, error)
    }

    fn complete(mut self) -> State {
        self.status = RunStatus::Completed;
        logging::log_graph_complete(self.steps, self.status);
        self.state
    }
}

/// Where a streaming run sends its events.
struct StreamSink {
    tx: mpsc::Sender<StreamEvent>,
    modes: HashSet<StreamMode>,
}

impl CompiledStateGraph {
    /// Step guard used when the run config does not override it.
    pub fn max_steps(&self) -> usize {
        self.inner.max_steps
    }

    pub fn channels(&self) -> &ChannelRegistry {
        &self.inner.channels
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.inner.nodes
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.inner.edges
    }

    /// Shared run loop used by invoke() and stream().
    ///
    /// One node at a time: run node, merge its update, route on the merged state.
    async fn run_loop(
        &self,
        state: State,
        config: &RunConfig,
        sink: Option<&StreamSink>,
    ) -> Result<State, InvokeError> {
        let parts = &*self.inner;
        let max_steps = config.max_steps.unwrap_or(parts.max_steps);
        let mut run = Run::new(state);

        logging::log_graph_start(max_steps);
        run.start();

        if let Err(e) = parts.channels.check_state(&run.state) {
            return Err(run.fail(e));
        }
        let mut current = match parts.edges.resolve_next(&START, &run.state) {
            Ok(next) => next,
            Err(e) => return Err(run.fail(e)),
        };

        while let Target::Node(node_id) = current {
            if run.steps >= max_steps {
                return Err(run.abort(GraphError::CycleLimitExceeded { limit: max_steps }));
            }

            logging::log_node_start(&node_id, run.steps);
            let update = match parts
                .nodes
                .invoke_with(&node_id, run.state.clone(), parts.middleware.as_ref())
                .await
            {
                Ok(update) => update,
                Err(e) => return Err(run.fail(e)),
            };

            let fields: Vec<String> = update.fields().map(str::to_string).collect();
            let streamed = sink
                .filter(|s| s.modes.contains(&StreamMode::Updates))
                .map(|_| update.clone());

            if let Err(e) = parts.channels.merge_all(&mut run.state, update) {
                return Err(run.fail(e));
            }
            run.steps += 1;
            let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            logging::log_state_update(&node_id, &field_refs);

            if let Some(sink) = sink {
                if sink.modes.contains(&StreamMode::Values) {
                    let _ = sink.tx.send(StreamEvent::Values(run.state.clone())).await;
                }
                if let Some(update) = streamed {
                    let _ = sink
                        .tx
                        .send(StreamEvent::Updates {
                            node_id: node_id.clone(),
                            update,
                        })
                        .await;
                }
            }

            let next = match parts
                .edges
                .resolve_next(&Source::Node(node_id.clone()), &run.state)
            {
                Ok(next) => next,
                Err(e) => return Err(run.fail(e)),
            };
            logging::log_node_complete(&node_id, &next);
            current = next;
        }

        Ok(run.complete())
    }

    /// Runs the graph from START until END.
    ///
    /// Returns the final state, or an `InvokeError` with the error kind and the last
    /// consistent merged state. Pass `None` for config to use the graph's settings.
    ///
    /// Initial fields with a registered channel must match its kind. Fields without
    /// one are carried through untouched.
    pub async fn invoke(&self, state: State, config: Option<RunConfig>) -> Result<State, InvokeError> {
        let config = config.unwrap_or_default();
        let span = tracing::info_span!("graph_run", run_id = ?config.run_id);
        self.run_loop(state, &config, None).instrument(span).await
    }

    /// Streams graph execution on a spawned task, emitting events via a channel-backed Stream.
    ///
    /// Dropping the stream does not cancel the run; later events are discarded.
    pub fn stream(
        &self,
        state: State,
        config: Option<RunConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let modes: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let config = config.unwrap_or_default();
            let span = tracing::info_span!("graph_run", run_id = ?config.run_id);
            let sink = StreamSink {
                tx: tx.clone(),
                modes,
            };
            let result = graph
                .run_loop(state, &config, Some(&sink))
                .instrument(span)
                .await;
            if let Err(err) = result {
                let _ = tx.send(StreamEvent::Error(err)).await;
            }
        });

        ReceiverStream::new(rx)
    }
}
