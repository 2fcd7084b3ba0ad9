//! Graph node trait and node registry.
//!
//! A node receives its own copy of the current [`State`] and returns a
//! [`StateUpdate`] with only the fields it changes. Whatever the node does to get
//! there (model calls, tool use) is opaque to the graph.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{GraphError, NodeError};
use crate::state::{State, StateUpdate};

use super::node_middleware::{NodeFuture, NodeMiddleware, NodeRunFn};

/// One step in a graph: state in, partial update out.
///
/// **Interaction**: Registered with `StateGraph::add_node`; awaited one at a time by
/// `CompiledStateGraph::invoke`. External resources (model client, tool set) are
/// captured when the node is constructed, not passed per call.
#[async_trait]
pub trait Node: Send + Sync {
    /// Fields this node may write. When `Some`, every field must have a registered
    /// channel or compilation fails with `UnknownChannel`.
    fn writes(&self) -> Option<&[String]> {
        None
    }

    /// One step: receives a snapshot of the state, returns the fields to change.
    async fn run(&self, state: State) -> Result<StateUpdate, NodeError>;
}

/// Node backed by an async closure `Fn(State) -> Future<Output = Result<StateUpdate, NodeError>>`.
pub struct FnNode<F> {
    f: F,
    writes: Option<Vec<String>>,
}

impl<F> FnNode<F> {
    pub fn new(f: F) -> Self {
        Self { f, writes: None }
    }

    /// Declares the fields this node writes, checked at compile time.
    pub fn with_writes<I, T>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.writes = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl<F, Fut> Node for FnNode<F>
where
    F: Fn(State) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StateUpdate, NodeError>> + Send + 'static,
{
    fn writes(&self) -> Option<&[String]> {
        self.writes.as_deref()
    }

    async fn run(&self, state: State) -> Result<StateUpdate, NodeError> {
        (self.f)(state).await
    }
}

/// Wraps an async closure as a shareable node.
pub fn node_fn<F, Fut>(f: F) -> Arc<dyn Node>
where
    F: Fn(State) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StateUpdate, NodeError>> + Send + 'static,
{
    Arc::new(FnNode::new(f))
}

/// Node name → node.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, Arc<dyn Node>>,
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.nodes.keys().collect();
        names.sort();
        f.debug_struct("NodeRegistry").field("nodes", &names).finish()
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` under `name`, returning the node it replaced, if any.
    pub fn register(&mut self, name: impl Into<String>, node: Arc<dyn Node>) -> Option<Arc<dyn Node>> {
        self.nodes.insert(name.into(), node)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Node>> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Runs node `name` on `state`. A node failure is returned as
    /// [`GraphError::NodeExecution`] with the cause unmodified.
    pub async fn invoke(&self, name: &str, state: State) -> Result<StateUpdate, GraphError> {
        self.invoke_with(name, state, None).await
    }

    /// Like [`invoke`](Self::invoke), routed through `middleware` when given.
    pub async fn invoke_with(
        &self,
        name: &str,
        state: State,
        middleware: Option<&Arc<dyn NodeMiddleware>>,
    ) -> Result<StateUpdate, GraphError> {
        let node = self
            .nodes
            .get(name)
            .cloned()
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;

        let result = match middleware {
            Some(middleware) => {
                let inner: NodeRunFn = Box::new(move |s| -> NodeFuture {
                    Box::pin(async move { node.run(s).await })
                });
                middleware.around_run(name, state, inner).await
            }
            None => node.run(state).await,
        };

        result.map_err(|source| GraphError::NodeExecution {
            node: name.to_string(),
            source,
        })
    }
}
