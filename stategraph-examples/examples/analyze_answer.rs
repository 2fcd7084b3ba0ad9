//! Two-node chain: analyze writes `intermediate`, answer reads it and writes `final`.
//!
//! Run: `cargo run -p stategraph-examples --example analyze_answer`

use std::sync::Arc;

use stategraph::{Channel, LoggingNodeMiddleware, NodeError, State, StateGraph, StateUpdate};
use stategraph_examples::{init_tracing, ChatModel, MockModel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let model = Arc::new(MockModel::new([
        "the user asks about ownership in rust",
        "ownership means each value has one owner",
    ]));
    let analyst = model.clone();
    let answerer = model.clone();

    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("intermediate", Channel::optional_string())
        .add_channel("final", Channel::optional_string())
        .add_node_fn("analyze", move |state: State| {
            let model = analyst.clone();
            async move {
                let Some(input) = state.get_str("input") else {
                    return Err(NodeError::ExecutionFailed("input is missing".into()));
                };
                let analysis = model.complete(input).await?;
                Ok::<_, NodeError>(StateUpdate::new().set("intermediate", analysis))
            }
        })
        .add_node_fn("answer", move |state: State| {
            let model = answerer.clone();
            async move {
                let Some(analysis) = state.get_str("intermediate") else {
                    return Err(NodeError::ExecutionFailed("analysis is missing".into()));
                };
                let answer = model.complete(analysis).await?;
                Ok::<_, NodeError>(StateUpdate::new().set("final", answer))
            }
        })
        .set_entry_point("analyze")
        .add_edge("analyze", "answer")
        .set_finish_point("answer");

    let app = graph.compile_with_middleware(Arc::new(LoggingNodeMiddleware))?;
    let out = app
        .invoke(State::new().with("input", "what is ownership?"), None)
        .await?;

    tracing::info!(
        analysis = out.get_str("intermediate").unwrap_or_default(),
        model_calls = model.calls(),
        "chain finished"
    );
    println!("{}", out.get_str("final").unwrap_or_default());
    Ok(())
}
