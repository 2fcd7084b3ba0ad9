//! Shared helpers for the stategraph examples: tracing setup and a scripted chat model.
//!
//! The examples never call a real model. [`MockModel`] returns canned replies so
//! each example is deterministic and runs offline.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use stategraph::NodeError;

/// Installs a stdout `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,stategraph=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Minimal chat model seam: prompt in, assistant text out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, NodeError>;
}

/// Model that replays a fixed list of replies, one per call, then repeats the last.
#[derive(Debug)]
pub struct MockModel {
    replies: Vec<String>,
    calls: AtomicUsize,
}

impl MockModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Model that echoes the prompt back with a prefix.
    pub fn echo() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for MockModel {
    async fn complete(&self, prompt: &str) -> Result<String, NodeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = if self.replies.is_empty() {
            format!("echo: {}", prompt)
        } else {
            self.replies[n.min(self.replies.len() - 1)].clone()
        };
        tracing::debug!(call = n, prompt, reply = %reply, "mock model completion");
        Ok(reply)
    }
}
