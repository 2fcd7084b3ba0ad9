//! Node middleware wrapping every node run of a compiled graph.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stategraph::{
    Channel, LoggingNodeMiddleware, NodeError, NodeMiddleware, NodeRunFn, State, StateGraph,
    StateUpdate, END, START,
};

/// Records node ids in call order.
#[derive(Default)]
struct RecordingMiddleware {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl NodeMiddleware for RecordingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        inner: NodeRunFn,
    ) -> Result<StateUpdate, NodeError> {
        self.seen.lock().unwrap().push(node_id.to_string());
        inner(state).await
    }
}

/// Adds a `tag` field to every update.
struct TaggingMiddleware;

#[async_trait]
impl NodeMiddleware for TaggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: State,
        inner: NodeRunFn,
    ) -> Result<StateUpdate, NodeError> {
        let update = inner(state).await?;
        Ok(update.set("tag", node_id))
    }
}

fn chain() -> StateGraph {
    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("tag", Channel::optional_string())
        .add_node_fn("first", |_s: State| async { Ok(StateUpdate::new()) })
        .add_node_fn("second", |_s: State| async { Ok(StateUpdate::new()) })
        .add_edge(START, "first")
        .add_edge("first", "second")
        .add_edge("second", END);
    graph
}

/// **Scenario**: compile_with_middleware wraps each node run, in execution order.
#[tokio::test]
async fn middleware_sees_every_node_in_order() {
    let recorder = Arc::new(RecordingMiddleware::default());
    let app = chain().compile_with_middleware(recorder.clone()).unwrap();
    app.invoke(State::new().with("input", 1), None).await.unwrap();
    assert_eq!(*recorder.seen.lock().unwrap(), vec!["first", "second"]);
}

/// **Scenario**: with_middleware().compile() installs the middleware; its update changes are merged.
#[tokio::test]
async fn builder_middleware_can_extend_updates() {
    let app = chain()
        .with_middleware(Arc::new(TaggingMiddleware))
        .compile()
        .unwrap();
    let out = app.invoke(State::new().with("input", 1), None).await.unwrap();
    assert_eq!(out.get_str("tag"), Some("second"));
}

/// **Scenario**: the logging middleware is transparent to the run's result.
#[tokio::test]
async fn logging_middleware_is_transparent() {
    let mut graph = StateGraph::new();
    graph
        .add_channel("input", Channel::scalar())
        .add_channel("out", Channel::optional_string())
        .add_node_fn("echo", |s: State| async move {
            let input = s.get_str("input").unwrap_or_default().to_string();
            Ok(StateUpdate::new().set("out", input))
        })
        .add_edge(START, "echo")
        .add_edge("echo", END);
    let logged = graph
        .compile_with_middleware(Arc::new(LoggingNodeMiddleware))
        .unwrap()
        .invoke(State::new().with("input", "X"), None)
        .await
        .unwrap();

    assert_eq!(logged.get_str("out"), Some("X"));
}
