//! StateGraph compile failure cases: unknown node, missing entry, duplicate and
//! conflicting edges, dangling nodes, undeclared channels, unmapped labels.

use stategraph::{
    node_fn, Channel, CompilationError, FnNode, Label, NodeError, State, StateGraph, StateUpdate,
    Target, END, START,
};

fn noop() -> std::sync::Arc<dyn stategraph::Node> {
    node_fn(|_s: State| async { Ok(StateUpdate::new()) })
}

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::new();
    graph.add_node("echo", noop());
    graph.add_edge(START, "echo");
    graph.add_edge("echo", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

/// **Scenario**: an edge leaving an unregistered node is rejected too.
#[test]
fn compile_fails_when_edge_source_is_unknown() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_edge("a", END)
        .add_edge("ghost", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::NodeNotFound("ghost".into()))
    );
}

/// **Scenario**: a graph without an edge from START cannot compile.
#[test]
fn compile_fails_without_entry() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop()).add_edge("a", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MissingEntry));
}

/// **Scenario**: setting the entry point twice is a duplicate edge from START.
#[test]
fn compile_fails_on_two_entry_points() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop())
        .add_node("b", noop())
        .set_entry_point("a")
        .add_edge(START, "b")
        .add_edge("a", END)
        .add_edge("b", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateEdge("__start__".into()))
    );
}

/// **Scenario**: registering two channels for one field fails with DuplicateChannel.
#[test]
fn compile_fails_on_duplicate_channel() {
    let mut graph = StateGraph::new();
    graph
        .add_channel("messages", Channel::sequence())
        .add_channel("messages", Channel::scalar())
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_edge("a", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateChannel("messages".into()))
    );
}

/// **Scenario**: a node with both a static and a conditional edge is rejected.
#[test]
fn compile_fails_on_static_and_conditional_edge() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_edge("a", END)
        .add_conditional_edges("a", |_s: &State| "x", [("x", END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::ConflictingEdges("a".into()))
    );
}

/// **Scenario**: a registered node without any outgoing edge is a compile-time DanglingNode.
#[test]
fn compile_fails_on_dangling_node() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop())
        .add_node("b", noop())
        .add_edge(START, "a")
        .add_edge("a", "b");
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DanglingNode("b".into()))
    );
}

/// **Scenario**: a node declaring a write to an unregistered field fails with UnknownChannel.
#[test]
fn compile_fails_on_declared_write_to_unknown_channel() {
    let mut graph = StateGraph::new();
    graph
        .add_channel("known", Channel::scalar())
        .add_node(
            "writer",
            std::sync::Arc::new(
                FnNode::new(|_s: State| async { Ok::<_, NodeError>(StateUpdate::new()) })
                    .with_writes(["known", "unknown"]),
            ),
        )
        .add_edge(START, "writer")
        .add_edge("writer", END);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::UnknownChannel {
            node: "writer".into(),
            channel: "unknown".into(),
        })
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Decision {
    Retry,
    Done,
}

impl Label for Decision {
    fn variants() -> Option<Vec<Self>> {
        Some(vec![Decision::Retry, Decision::Done])
    }
}

/// **Scenario**: an enum label variant missing from the table fails with UnmappedLabel.
#[test]
fn compile_fails_on_unmapped_enum_label() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_conditional_edges("a", |_s: &State| Decision::Done, [(Decision::Done, END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::UnmappedLabel {
            node: "a".into(),
            label: "Retry".into(),
        })
    );
}

/// **Scenario**: a conditional edge whose table references an unknown node is rejected.
#[test]
fn compile_fails_when_label_table_targets_unknown_node() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_conditional_edges(
            "a",
            |_s: &State| true,
            [(true, Target::from("nowhere")), (false, END)],
        );
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::NodeNotFound("nowhere".into()))
    );
}
