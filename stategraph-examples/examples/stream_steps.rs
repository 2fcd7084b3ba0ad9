//! Streams a bounded loop step by step, then shows the error event when the step
//! guard trips.
//!
//! Run: `cargo run -p stategraph-examples --example stream_steps`

use stategraph::{
    Channel, State, StateGraph, StateUpdate, StreamEvent, StreamMode, Target, END, START,
};
use stategraph_examples::init_tracing;
use tokio_stream::StreamExt;

fn looping_graph(max_steps: usize) -> StateGraph {
    let mut graph = StateGraph::new().with_max_steps(max_steps);
    graph
        .add_channel("counter", Channel::counter())
        .add_node_fn("tick", |_state: State| async { Ok(StateUpdate::new().set("counter", 1)) })
        .add_edge(START, "tick")
        .add_conditional_edges(
            "tick",
            |state: &State| state.get_i64("counter").unwrap_or(0) < 5,
            [(true, Target::from("tick")), (false, END)],
        );
    graph
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    for max_steps in [10, 3] {
        println!("-- max_steps = {}", max_steps);
        let app = looping_graph(max_steps).compile()?;
        let mut events = app.stream(
            State::new().with("counter", 0),
            None,
            [StreamMode::Values, StreamMode::Updates],
        );
        while let Some(event) = events.next().await {
            match event {
                StreamEvent::Values(state) => {
                    println!("values:  counter = {}", state.get_i64("counter").unwrap_or(0))
                }
                StreamEvent::Updates { node_id, update } => {
                    println!("updates: {} wrote {:?}", node_id, update.fields().collect::<Vec<_>>())
                }
                StreamEvent::Error(err) => println!("error:   {}", err),
            }
        }
    }
    Ok(())
}
