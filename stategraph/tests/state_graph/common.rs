//! Shared graph builders for the state_graph integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stategraph::{
    node_fn, Channel, CompiledStateGraph, Node, NodeError, State, StateGraph, StateUpdate, Target,
    END, START,
};

/// Node that counts its runs and increments `counter` by one.
pub fn counting_increment(calls: Arc<AtomicUsize>) -> Arc<dyn Node> {
    node_fn(move |_state: State| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(StateUpdate::new().set("counter", 1))
        }
    })
}

/// Self-looping counter: `agent` increments `counter` while `counter < 3`, then END.
pub fn counter_graph(calls: Arc<AtomicUsize>, max_steps: Option<usize>) -> CompiledStateGraph {
    let graph = StateGraph::new();
    let mut graph = match max_steps {
        Some(n) => graph.with_max_steps(n),
        None => graph,
    };
    graph
        .add_channel("counter", Channel::counter())
        .add_node("agent", counting_increment(calls))
        .add_edge(START, "agent")
        .add_conditional_edges(
            "agent",
            |s: &State| {
                if s.get_i64("counter").unwrap_or(0) < 3 {
                    "continue"
                } else {
                    "end"
                }
            },
            [("continue", Target::from("agent")), ("end", END)],
        );
    graph.compile().expect("counter graph compiles")
}

/// Two-step chain: `analyze` derives `intermediate` from `input`, `answer` derives `final`.
pub fn analyze_answer_graph() -> CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("intermediate", Channel::optional_string())
        .add_channel("final", Channel::optional_string())
        .add_node_fn("analyze", |state: State| async move {
            let Some(input) = state.get_str("input") else {
                return Err(NodeError::ExecutionFailed("missing input".into()));
            };
            Ok(StateUpdate::new().set("intermediate", format!("analysis of {}", input)))
        })
        .add_node_fn("answer", |state: State| async move {
            let Some(intermediate) = state.get_str("intermediate") else {
                return Err(NodeError::ExecutionFailed("missing intermediate".into()));
            };
            Ok(StateUpdate::new().set("final", format!("answer from {}", intermediate)))
        })
        .set_entry_point("analyze")
        .add_edge("analyze", "answer")
        .add_edge("answer", END);
    graph.compile().expect("chain graph compiles")
}

/// Node that always fails with the given message.
pub fn failing_node(message: &'static str) -> Arc<dyn Node> {
    node_fn(move |_state: State| async move { Err(NodeError::ExecutionFailed(message.into())) })
}
