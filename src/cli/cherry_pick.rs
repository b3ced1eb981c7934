//! Cherry-pick command

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use pr_cherrypick::cherry_pick::{CherryPickOutcome, CherryPicker};
use pr_cherrypick::config::Overrides;
use pr_cherrypick::error::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Run the cherry-pick command
pub async fn run_cherry_pick(
    path: &Path,
    pr_number: u64,
    target_branch: &str,
    overrides: Overrides,
) -> Result<CherryPickOutcome> {
    let ctx = CommandContext::new(path, overrides)?;

    // Ctrl-C stops the run at the next step boundary
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let picker = CherryPicker::new(&ctx.gateway, &ctx.repo, ctx.options.clone());
    let progress = CliProgress::spinner();
    let result = picker
        .create_cherry_pick(pr_number, target_branch, &progress, &cancel)
        .await;

    watcher.abort();
    result
}
