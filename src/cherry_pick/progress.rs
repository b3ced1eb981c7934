//! Progress reporting hooks

use super::state::CherryPickRun;
use async_trait::async_trait;

/// Receives updates while a run progresses
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called after every state transition
    async fn on_state(&self, run: &CherryPickRun);

    /// Called with free-form status messages
    async fn on_message(&self, message: &str);
}

/// Progress sink that discards everything
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_state(&self, _run: &CherryPickRun) {}

    async fn on_message(&self, _message: &str) {}
}
