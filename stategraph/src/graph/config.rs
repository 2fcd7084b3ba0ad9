//! Invoke config: run id and step-guard override.
//!
//! Passed as `Option<RunConfig>` to `CompiledStateGraph::invoke` and `stream`.

/// Step guard used when neither the graph nor the run config sets one.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Config for a single invoke.
///
/// **Interaction**: Passed to `CompiledStateGraph::invoke(state, config)`. Unset
/// fields fall back to the graph's compile-time settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Identifier recorded on the run's tracing span.
    pub run_id: Option<String>,
    /// Overrides the graph's step guard for this run.
    pub max_steps: Option<usize>,
}

impl RunConfig {
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}
