//! Conditional entry with an enum label: route each question to a calculator or a
//! search node. Every `Tool` variant must appear in the table or `compile` fails.
//!
//! Run: `cargo run -p stategraph-examples --example tool_choice`

use stategraph::{Channel, Label, State, StateGraph, StateUpdate, Target, END};
use stategraph_examples::init_tracing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Tool {
    Calculator,
    Search,
}

impl Label for Tool {
    fn variants() -> Option<Vec<Self>> {
        Some(vec![Tool::Calculator, Tool::Search])
    }
}

fn pick_tool(state: &State) -> Tool {
    let input = state.get_str("input").unwrap_or_default();
    if input.chars().any(|c| c.is_ascii_digit()) {
        Tool::Calculator
    } else {
        Tool::Search
    }
}

fn sum_numbers(text: &str) -> i64 {
    text.split(|c: char| !c.is_ascii_digit())
        .filter_map(|part| part.parse::<i64>().ok())
        .sum()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("tool", Channel::optional_string())
        .add_channel("result", Channel::optional_string())
        .add_node_fn("calculator", |state: State| async move {
            let total = sum_numbers(state.get_str("input").unwrap_or_default());
            Ok(StateUpdate::new()
                .set("tool", "calculator")
                .set("result", total.to_string()))
        })
        .add_node_fn("search", |state: State| async move {
            let query = state.get_str("input").unwrap_or_default().to_string();
            Ok(StateUpdate::new()
                .set("tool", "search")
                .set("result", format!("top hit for '{}'", query)))
        })
        .set_conditional_entry_point(
            pick_tool,
            [
                (Tool::Calculator, Target::from("calculator")),
                (Tool::Search, Target::from("search")),
            ],
        )
        .add_edge("calculator", END)
        .add_edge("search", END);

    let app = graph.compile()?;
    for question in ["add 2 and 40", "who wrote the rust book"] {
        let out = app.invoke(State::new().with("input", question), None).await?;
        println!(
            "{} -> {}: {}",
            question,
            out.get_str("tool").unwrap_or_default(),
            out.get_str("result").unwrap_or_default()
        );
    }
    Ok(())
}
