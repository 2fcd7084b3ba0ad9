//! State graph: channels, nodes, static and conditional edges; compile and invoke.
//!
//! Build a [`StateGraph`], compile it into a [`CompiledStateGraph`], then invoke it
//! with an initial [`State`](crate::state::State) any number of times.

mod compile_error;
mod compiled;
mod config;
mod edge;
mod invoke_error;
mod logging;
mod node;
mod node_middleware;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use config::{RunConfig, DEFAULT_MAX_STEPS};
pub use edge::{Edge, EdgeTable, Label, Router, Source, Target, END, START};
pub use invoke_error::{InvokeError, RunStatus};
pub use node::{node_fn, FnNode, Node, NodeRegistry};
pub use node_middleware::{LoggingNodeMiddleware, NodeFuture, NodeMiddleware, NodeRunFn};
pub use state_graph::StateGraph;
