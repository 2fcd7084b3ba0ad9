//! # stategraph
//!
//! A small directed state-graph executor. One shared [`State`] flows through named
//! async nodes; each node returns a partial [`StateUpdate`] that per-field
//! [`Channel`]s merge back in; static or conditional edges pick the next node,
//! cycles included, until the run reaches [`END`] or the step guard trips.
//!
//! ## Design Principles
//!
//! - **Merge, never replace**: nodes return only the fields they change. Each field's
//!   reducer decides how an incoming value combines with the previous one
//!   (last value, append, add, or a custom closure).
//! - **Route on merged state**: conditional routers always see the state after the
//!   current node's update was applied.
//! - **One node at a time**: an invocation awaits exactly one node per step, so the
//!   per-run state needs no locking. A compiled graph is immutable and can serve many
//!   concurrent invocations.
//! - **Bounded cycles**: self-loops are allowed; `max_steps` (default
//!   [`DEFAULT_MAX_STEPS`]) aborts a run that never reaches END.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, edges, errors.
//! - [`channel`]: `Channel`, `FieldKind`, reducers, `ChannelRegistry`.
//! - [`state`]: `State`, `StateUpdate`, `Write`.
//! - [`stream`]: `StreamMode`, `StreamEvent` for `CompiledStateGraph::stream`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stategraph::{Channel, State, StateGraph, StateUpdate, END, START};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = StateGraph::new();
//! graph
//!     .add_channel("input", Channel::scalar())
//!     .add_channel("response", Channel::optional_string())
//!     .add_node_fn("responder", |state: State| async move {
//!         let input = state.get_str("input").unwrap_or_default().to_string();
//!         Ok(StateUpdate::new().set("response", format!("echo: {}", input)))
//!     })
//!     .add_edge(START, "responder")
//!     .add_edge("responder", END);
//!
//! let app = graph.compile()?;
//! let out = app.invoke(State::new().with("input", "hello"), None).await?;
//! assert_eq!(out.get_str("response"), Some("echo: hello"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The engine emits `tracing` events (graph start/complete at info, per-node at
//! debug) inside a `graph_run` span. It never installs a subscriber.

pub mod channel;
pub mod error;
pub mod graph;
pub mod state;
pub mod stream;

pub use channel::{
    reducer_fn, Add, Append, Channel, ChannelRegistry, FieldKind, LastValue, Reducer,
    ReducerError,
};
pub use error::{GraphError, NodeError};
pub use graph::{
    node_fn, CompilationError, CompiledStateGraph, FnNode, InvokeError, Label,
    LoggingNodeMiddleware, Node, NodeFuture, NodeMiddleware, NodeRunFn, RunConfig, RunStatus,
    Source, StateGraph, Target, DEFAULT_MAX_STEPS, END, START,
};
pub use state::{State, StateUpdate, Write};
pub use stream::{StreamEvent, StreamMode};
