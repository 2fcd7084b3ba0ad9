//! State graph builder: channels, nodes and edges, then compile.
//!
//! Register channels with `add_channel`, nodes with `add_node`, wire them with
//! `add_edge(from, to)` / `add_conditional_edges` using `START` and `END` for entry
//! and exit, then `compile` to get an immutable `CompiledStateGraph`.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::sync::Arc;

use crate::channel::{Channel, ChannelRegistry};
use crate::error::NodeError;
use crate::state::{State, StateUpdate};

use super::compile_error::CompilationError;
use super::compiled::{CompiledStateGraph, GraphParts};
use super::config::DEFAULT_MAX_STEPS;
use super::edge::{Edge, EdgeTable, Label, Router, Source, Target, END, START};
use super::node::{FnNode, Node, NodeRegistry};
use super::node_middleware::NodeMiddleware;

/// State graph under construction.
///
/// Declarations are only recorded here; all validation happens in `compile()`, so
/// the builder methods chain without intermediate `Result`s.
///
/// **Interaction**: Accepts `Channel`s and `Arc<dyn Node>`; produces `CompiledStateGraph`.
pub struct StateGraph {
    channels: ChannelRegistry,
    nodes: NodeRegistry,
    duplicate_nodes: Vec<String>,
    duplicate_channels: Vec<String>,
    /// Edge declarations in insertion order; the edge table is built from these at compile time.
    edges: Vec<(Source, Edge)>,
    max_steps: usize,
    middleware: Option<Arc<dyn NodeMiddleware>>,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    /// Creates an empty graph with the default step guard.
    pub fn new() -> Self {
        Self {
            channels: ChannelRegistry::new(),
            nodes: NodeRegistry::new(),
            duplicate_nodes: Vec::new(),
            duplicate_channels: Vec::new(),
            edges: Vec::new(),
            max_steps: DEFAULT_MAX_STEPS,
            middleware: None,
        }
    }

    /// Sets the step guard for every invocation of the compiled graph.
    /// `RunConfig::max_steps` still overrides it per run.
    pub fn with_max_steps(self, max_steps: usize) -> Self {
        Self { max_steps, ..self }
    }

    /// Attaches node middleware; `compile()` will wrap every node run with it.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Registers the channel for state field `field`; the field must be unique
    /// (duplicates fail at compile time).
    pub fn add_channel(&mut self, field: impl Into<String>, channel: Channel) -> &mut Self {
        let field = field.into();
        if self.channels.contains(&field) {
            self.duplicate_channels.push(field.clone());
        }
        self.channels.register(field, channel);
        self
    }

    /// Adds a node; the id must be unique (duplicates fail at compile time).
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        let id = id.into();
        if self.nodes.register(id.clone(), node).is_some() {
            self.duplicate_nodes.push(id);
        }
        self
    }

    /// Adds a node backed by an async closure.
    pub fn add_node_fn<F, Fut>(&mut self, id: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(State) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<StateUpdate, NodeError>> + Send + 'static,
    {
        self.add_node(id, Arc::new(FnNode::new(f)))
    }

    /// Adds a static edge from `from` to `to`.
    pub fn add_edge(&mut self, from: impl Into<Source>, to: impl Into<Target>) -> &mut Self {
        self.edges.push((from.into(), Edge::Static(to.into())));
        self
    }

    /// Adds a conditional edge: after `from` runs and its update is merged, `router`
    /// labels the state and `table` maps the label to the next node or `END`.
    pub fn add_conditional_edges<L, F, I, T>(
        &mut self,
        from: impl Into<Source>,
        router: F,
        table: I,
    ) -> &mut Self
    where
        L: Label,
        F: Fn(&State) -> L + Send + Sync + 'static,
        I: IntoIterator<Item = (L, T)>,
        T: Into<Target>,
    {
        self.edges
            .push((from.into(), Edge::Conditional(Router::new(router, table))));
        self
    }

    /// Same as `add_edge(START, id)`.
    pub fn set_entry_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.add_edge(START, Target::Node(id.into()))
    }

    /// Conditional entry: the router is evaluated against the initial state.
    pub fn set_conditional_entry_point<L, F, I, T>(&mut self, router: F, table: I) -> &mut Self
    where
        L: Label,
        F: Fn(&State) -> L + Send + Sync + 'static,
        I: IntoIterator<Item = (L, T)>,
        T: Into<Target>,
    {
        self.add_conditional_edges(START, router, table)
    }

    /// Same as `add_edge(id, END)`.
    pub fn set_finish_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.add_edge(Source::Node(id.into()), END)
    }

    /// Builds the executable graph.
    ///
    /// Returns `CompilationError` if a node id or channel field is duplicated, an edge references an
    /// unknown node, a source has more than one edge, there is no entry edge, a node
    /// has no outgoing edge, a declared write names an unknown channel, or an
    /// enumerable router label is unmapped.
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        let middleware = self.middleware.clone();
        self.compile_internal(middleware)
    }

    /// Builds the executable graph with node middleware wrapping each node run.
    pub fn compile_with_middleware(
        self,
        middleware: Arc<dyn NodeMiddleware>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(Some(middleware))
    }

    fn compile_internal(
        self,
        middleware: Option<Arc<dyn NodeMiddleware>>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        if let Some(id) = self.duplicate_nodes.first() {
            return Err(CompilationError::DuplicateNode(id.clone()));
        }
        if let Some(field) = self.duplicate_channels.first() {
            return Err(CompilationError::DuplicateChannel(field.clone()));
        }

        for name in self.nodes.names() {
            let writes = self.nodes.get(name).and_then(|n| n.writes());
            for field in writes.unwrap_or_default() {
                if !self.channels.contains(field) {
                    return Err(CompilationError::UnknownChannel {
                        node: name.to_string(),
                        channel: field.clone(),
                    });
                }
            }
        }

        let mut table = EdgeTable::new();
        for (from, edge) in self.edges {
            if let Source::Node(id) = &from {
                if !self.nodes.contains(id) {
                    return Err(CompilationError::NodeNotFound(id.clone()));
                }
            }
            for target in edge.targets() {
                if let Target::Node(id) = target {
                    if !self.nodes.contains(id) {
                        return Err(CompilationError::NodeNotFound(id.clone()));
                    }
                }
            }
            if let Edge::Conditional(router) = &edge {
                if let Some(label) = router.unmapped_labels().first() {
                    return Err(CompilationError::UnmappedLabel {
                        node: from.to_string(),
                        label: label.clone(),
                    });
                }
            }
            table.insert(from, edge)?;
        }

        if table.get(&START).is_none() {
            return Err(CompilationError::MissingEntry);
        }
        for name in self.nodes.names() {
            if table.get(&Source::Node(name.to_string())).is_none() {
                return Err(CompilationError::DanglingNode(name.to_string()));
            }
        }

        warn_unreachable(&table, &self.nodes);

        Ok(CompiledStateGraph {
            inner: Arc::new(GraphParts {
                channels: self.channels,
                nodes: self.nodes,
                edges: table,
                max_steps: self.max_steps,
                middleware,
            }),
        })
    }
}

/// Logs nodes that no path from START reaches. They are legal but never run.
fn warn_unreachable(table: &EdgeTable, nodes: &NodeRegistry) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue = VecDeque::from([START]);
    while let Some(source) = queue.pop_front() {
        let Some(edge) = table.get(&source) else {
            continue;
        };
        for target in edge.targets() {
            if let Target::Node(id) = target {
                if seen.insert(id.clone()) {
                    queue.push_back(Source::Node(id.clone()));
                }
            }
        }
    }
    for name in nodes.names() {
        if !seen.contains(name) {
            tracing::warn!(node_id = name, "node is unreachable from START");
        }
    }
}
