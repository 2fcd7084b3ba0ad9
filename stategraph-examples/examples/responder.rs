//! Single-node graph: START → responder → END.
//!
//! Run: `cargo run -p stategraph-examples --example responder -- "your question"`

use std::sync::Arc;

use stategraph::{Channel, NodeError, State, StateGraph, StateUpdate, END, START};
use stategraph_examples::{init_tracing, ChatModel, MockModel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();
    let input = std::env::args().nth(1).unwrap_or_else(|| "hello".to_string());

    let model = Arc::new(MockModel::echo());
    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("response", Channel::optional_string())
        .add_node_fn("responder", move |state: State| {
            let model = model.clone();
            async move {
                let prompt = state.get_str("input").unwrap_or_default().to_string();
                let reply = model.complete(&prompt).await?;
                Ok::<_, NodeError>(StateUpdate::new().set("response", reply))
            }
        })
        .add_edge(START, "responder")
        .add_edge("responder", END);

    let app = graph.compile()?;
    let out = app.invoke(State::new().with("input", input), None).await?;
    println!("{}", out.get_str("response").unwrap_or_default());
    Ok(())
}
