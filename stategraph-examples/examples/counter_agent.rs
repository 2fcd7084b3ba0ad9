//! Self-looping agent: appends one reply per turn to `messages` until `counter` reaches 3.
//!
//! `messages` uses the append reducer, `counter` the default last-value reducer, so
//! the node writes `counter + 1` itself.
//!
//! Run: `cargo run -p stategraph-examples --example counter_agent`

use std::sync::Arc;

use serde_json::json;
use stategraph::{
    Channel, FieldKind, NodeError, RunConfig, State, StateGraph, StateUpdate, Target, END, START,
};
use stategraph_examples::{init_tracing, ChatModel, MockModel};

const MAX_TURNS: i64 = 3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let model = Arc::new(MockModel::new([
        "let me think",
        "still thinking",
        "done thinking",
    ]));

    let mut graph = StateGraph::new().with_max_steps(10);
    graph
        .add_channel("messages", Channel::sequence())
        .add_channel("counter", Channel::new(FieldKind::Counter))
        .add_node_fn("agent", move |state: State| {
            let model = model.clone();
            async move {
                let counter = state.get_i64("counter").unwrap_or(0);
                let reply = model.complete(&format!("turn {}", counter)).await?;
                Ok::<_, NodeError>(
                    StateUpdate::new()
                        .set("messages", json!([{ "role": "assistant", "content": reply }]))
                        .set("counter", counter + 1),
                )
            }
        })
        .add_edge(START, "agent")
        .add_conditional_edges(
            "agent",
            |state: &State| state.get_i64("counter").unwrap_or(0) < MAX_TURNS,
            [(true, Target::from("agent")), (false, END)],
        );

    let app = graph.compile()?;
    let initial = State::new()
        .with("messages", json!([{ "role": "user", "content": "think three times" }]))
        .with("counter", 0);
    let out = app
        .invoke(initial, Some(RunConfig::default().with_run_id("counter-demo")))
        .await?;

    for message in out.get_array("messages").into_iter().flatten() {
        println!(
            "[{}] {}",
            message["role"].as_str().unwrap_or_default(),
            message["content"].as_str().unwrap_or_default()
        );
    }
    tracing::info!(
        turns = out.get_i64("counter").unwrap_or_default(),
        messages = out.get_array("messages").map(Vec::len).unwrap_or_default(),
        "agent finished"
    );
    Ok(())
}
