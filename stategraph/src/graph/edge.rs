//! Edges: entry/terminal markers, static successors and conditional routers.
//!
//! Every source (the entry marker or a node) has exactly one [`Edge`]: either a
//! fixed [`Target`] or a [`Router`] that labels the post-merge state and looks the
//! label up in its table.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::GraphError;
use crate::state::State;

use super::compile_error::CompilationError;

/// Where an edge starts: the entry marker or a named node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Start,
    Node(String),
}

/// Where an edge leads: a named node or the terminal marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Node(String),
    End,
}

/// Entry marker: use as `from` in `add_edge(START, first_node)`.
pub const START: Source = Source::Start;

/// Terminal marker: use as `to` in `add_edge(last_node, END)`. Never invoked.
pub const END: Target = Target::End;

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Start => f.write_str("__start__"),
            Source::Node(id) => f.write_str(id),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Node(id) => f.write_str(id),
            Target::End => f.write_str("__end__"),
        }
    }
}

impl From<&str> for Source {
    fn from(id: &str) -> Self {
        Source::Node(id.to_string())
    }
}

impl From<String> for Source {
    fn from(id: String) -> Self {
        Source::Node(id)
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::Node(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::Node(id)
    }
}

/// Routing label type for one conditional edge.
///
/// Implement it for a small enum to get compile-time coverage checking: when
/// [`variants`](Label::variants) returns `Some`, every variant must be mapped in
/// the edge's table or compilation fails with `UnmappedLabel`.
pub trait Label: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    fn variants() -> Option<Vec<Self>> {
        None
    }
}

impl Label for String {}

impl Label for &'static str {}

impl Label for bool {
    fn variants() -> Option<Vec<Self>> {
        Some(vec![true, false])
    }
}

type RouteFn = dyn Fn(&State) -> Result<Target, String> + Send + Sync;

/// Type-erased conditional edge: router plus its label table.
#[derive(Clone)]
pub struct Router {
    route: Arc<RouteFn>,
    targets: Vec<Target>,
    unmapped: Vec<String>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("targets", &self.targets)
            .field("unmapped", &self.unmapped)
            .finish()
    }
}

impl Router {
    /// Builds a router from a synchronous labelling function and a label → target table.
    pub fn new<L, F, I, T>(router: F, table: I) -> Self
    where
        L: Label,
        F: Fn(&State) -> L + Send + Sync + 'static,
        I: IntoIterator<Item = (L, T)>,
        T: Into<Target>,
    {
        let table: HashMap<L, Target> = table.into_iter().map(|(l, t)| (l, t.into())).collect();
        let unmapped = L::variants()
            .map(|all| {
                all.into_iter()
                    .filter(|l| !table.contains_key(l))
                    .map(|l| format!("{:?}", l))
                    .collect()
            })
            .unwrap_or_default();
        let targets = table.values().cloned().collect();
        let route = move |state: &State| {
            let label = router(state);
            table
                .get(&label)
                .cloned()
                .ok_or_else(|| format!("{:?}", label))
        };
        Self {
            route: Arc::new(route),
            targets,
            unmapped,
        }
    }

    /// Evaluates the router. `Err` carries the unmapped label (Debug form).
    pub fn route(&self, state: &State) -> Result<Target, String> {
        (self.route)(state)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Labels of an enumerable label type that have no entry in the table.
    pub fn unmapped_labels(&self) -> &[String] {
        &self.unmapped
    }
}

/// The single outgoing edge of a source.
#[derive(Debug, Clone)]
pub enum Edge {
    Static(Target),
    Conditional(Router),
}

impl Edge {
    pub fn targets(&self) -> Vec<&Target> {
        match self {
            Edge::Static(t) => vec![t],
            Edge::Conditional(r) => r.targets().iter().collect(),
        }
    }

    fn is_conditional(&self) -> bool {
        matches!(self, Edge::Conditional(_))
    }
}

/// Source → edge. Immutable once the graph is compiled.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: HashMap<Source, Edge>,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the static edge of `from`. Fails if `from` already has an edge.
    pub fn set_static(&mut self, from: Source, to: Target) -> Result<(), CompilationError> {
        self.insert(from, Edge::Static(to))
    }

    /// Sets the conditional edge of `from`. Fails if `from` already has an edge.
    pub fn set_conditional(&mut self, from: Source, router: Router) -> Result<(), CompilationError> {
        self.insert(from, Edge::Conditional(router))
    }

    pub(crate) fn insert(&mut self, from: Source, edge: Edge) -> Result<(), CompilationError> {
        if let Some(existing) = self.edges.get(&from) {
            return Err(if existing.is_conditional() != edge.is_conditional() {
                CompilationError::ConflictingEdges(from.to_string())
            } else {
                CompilationError::DuplicateEdge(from.to_string())
            });
        }
        self.edges.insert(from, edge);
        Ok(())
    }

    pub fn get(&self, from: &Source) -> Option<&Edge> {
        self.edges.get(from)
    }

    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.edges.keys()
    }

    /// Next hop from `from` given the post-merge `state`.
    pub fn resolve_next(&self, from: &Source, state: &State) -> Result<Target, GraphError> {
        match self.edges.get(from) {
            None => Err(GraphError::DanglingNode(from.to_string())),
            Some(Edge::Static(to)) => Ok(to.clone()),
            Some(Edge::Conditional(router)) => {
                router
                    .route(state)
                    .map_err(|label| GraphError::UnroutableLabel {
                        node: from.to_string(),
                        label,
                    })
            }
        }
    }
}
