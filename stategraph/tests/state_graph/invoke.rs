//! StateGraph invoke output: chains, no-op graphs, merge of untouched fields.

use serde_json::json;
use stategraph::{Channel, FieldKind, State, StateGraph, StateUpdate, END, START};

use crate::common::analyze_answer_graph;

/// **Scenario**: analyze → answer keeps `input` and sets `intermediate` and `final`.
#[tokio::test]
async fn two_node_chain_keeps_input_and_derives_outputs() {
    let app = analyze_answer_graph();
    let out = app
        .invoke(State::new().with("input", "X"), None)
        .await
        .unwrap();
    assert_eq!(out.get_str("input"), Some("X"));
    assert_eq!(out.get_str("intermediate"), Some("analysis of X"));
    assert_eq!(out.get_str("final"), Some("answer from analysis of X"));
    assert_eq!(out.len(), 3);
}

/// **Scenario**: a graph whose entry routes straight to END returns the initial state unchanged.
#[tokio::test]
async fn entry_to_end_returns_initial_state() {
    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("messages", Channel::sequence())
        .add_edge(START, END);
    let app = graph.compile().unwrap();
    let initial = State::new()
        .with("input", "X")
        .with("messages", json!(["a"]));
    let out = app.invoke(initial.clone(), None).await.unwrap();
    assert_eq!(out, initial);
}

/// **Scenario**: with no channels registered, START → END still returns the caller's state.
#[tokio::test]
async fn entry_to_end_without_channels_passes_state_through() {
    let mut graph = StateGraph::new();
    graph.add_edge(START, END);
    let app = graph.compile().unwrap();
    let initial = State::new().with("input", "X");
    let out = app.invoke(initial.clone(), None).await.unwrap();
    assert_eq!(out, initial);
}

/// **Scenario**: an unregistered initial field survives a run whose nodes never write it.
#[tokio::test]
async fn unregistered_initial_field_is_untouched_by_run() {
    let app = analyze_answer_graph();
    let out = app
        .invoke(State::new().with("input", "X").with("trace_id", "t-1"), None)
        .await
        .unwrap();
    assert_eq!(out.get_str("trace_id"), Some("t-1"));
    assert_eq!(out.get_str("final"), Some("answer from analysis of X"));
}

/// **Scenario**: a single responder node writes `response` from `input`.
#[tokio::test]
async fn single_responder_node() {
    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("response", Channel::optional_string())
        .add_node_fn("responder", |state: State| async move {
            let input = state.get_str("input").unwrap_or_default().to_string();
            Ok(StateUpdate::new().set("response", input.to_uppercase()))
        })
        .add_edge(START, "responder")
        .add_edge("responder", END);
    let app = graph.compile().unwrap();
    let out = app
        .invoke(State::new().with("input", "hola"), None)
        .await
        .unwrap();
    assert_eq!(out.get_str("response"), Some("HOLA"));
}

/// **Scenario**: a node's Clear write removes the field; an empty update changes nothing.
#[tokio::test]
async fn clear_and_empty_updates() {
    let mut graph = StateGraph::new();
    graph
        .add_channel("scratch", Channel::new(FieldKind::Any))
        .add_channel("kept", Channel::scalar())
        .add_node_fn("wipe", |_s: State| async { Ok(StateUpdate::new().clear("scratch")) })
        .add_node_fn("idle", |_s: State| async { Ok(StateUpdate::new()) })
        .add_edge(START, "wipe")
        .add_edge("wipe", "idle")
        .add_edge("idle", END);
    let app = graph.compile().unwrap();
    let out = app
        .invoke(State::new().with("scratch", 1).with("kept", true), None)
        .await
        .unwrap();
    assert!(!out.contains("scratch"));
    assert_eq!(out.get("kept"), Some(&json!(true)));
}

/// **Scenario**: the compiled graph can be invoked repeatedly with independent states.
#[tokio::test]
async fn compiled_graph_is_reusable() {
    let app = analyze_answer_graph();
    let a = app.invoke(State::new().with("input", "A"), None).await.unwrap();
    let b = app.invoke(State::new().with("input", "B"), None).await.unwrap();
    assert_eq!(a.get_str("final"), Some("answer from analysis of A"));
    assert_eq!(b.get_str("final"), Some("answer from analysis of B"));
}
