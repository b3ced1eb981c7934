//! Shared test fixtures

#![allow(dead_code)]

mod mock_gateway;
mod mock_repo;

pub use mock_gateway::MockGateway;
pub use mock_repo::{MockRepo, RepoCall};
pub use temp_repo::TempGitRepo;

use async_trait::async_trait;
use pr_cherrypick::cherry_pick::{CherryPickRun, ProgressCallback, RunState};
use pr_cherrypick::types::{ChangedFile, Commit, PlatformConfig, PullRequest, PullRequestDetails};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Config for the `acme/widgets` test repository
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        host: None,
    }
}

/// Changed files with the given blob SHAs, one file per blob
pub fn files(blobs: &[&str]) -> Vec<ChangedFile> {
    blobs
        .iter()
        .enumerate()
        .map(|(i, blob)| ChangedFile::new(format!("src/file_{i}.rs"), *blob))
        .collect()
}

/// A commit with the given parents and changed blobs
pub fn make_commit(sha: &str, parents: &[&str], blobs: &[&str]) -> Commit {
    Commit {
        sha: sha.to_string(),
        tree_sha: Some(format!("tree-{sha}")),
        parents: parents.iter().map(ToString::to_string).collect(),
        files: files(blobs),
    }
}

/// Details for a merged PR landed at `merge_sha`
pub fn merged_pr_details(number: u64, merge_sha: &str) -> PullRequestDetails {
    PullRequestDetails {
        number,
        title: format!("Change #{number}"),
        author: "octocat".to_string(),
        base_ref: "main".to_string(),
        head_ref: format!("feature-{number}"),
        merged: true,
        merge_commit_sha: Some(merge_sha.to_string()),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
    }
}

/// A `PullRequest` value built directly, bypassing the gateway
pub fn make_pr(number: u64, merge_sha: &str, head_commits: Vec<Commit>) -> PullRequest {
    PullRequest {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        number,
        merge_commit_sha: merge_sha.to_string(),
        head_commits,
        username: "octocat".to_string(),
        base_branch: "main".to_string(),
        head_ref: format!("feature-{number}"),
        title: format!("Change #{number}"),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
    }
}

// === Scenarios ===

/// PR #100: two commits squashed into `abc123`
pub fn setup_squash_pr(gateway: &MockGateway) {
    gateway.add_pull_request(merged_pr_details(100, "abc123"));
    gateway.set_pr_commits(
        100,
        vec![
            make_commit("p100-1", &["base"], &["blob-a1"]),
            make_commit("p100-2", &["p100-1"], &["blob-a2"]),
        ],
    );
    gateway.add_commit(make_commit("abc123", &["base"], &["blob-a1", "blob-a2"]));
}

/// PR #200: three commits rebased onto main as `b1`, `b2`, `b3`
pub fn setup_rebase_pr(gateway: &MockGateway) {
    gateway.add_pull_request(merged_pr_details(200, "b3"));
    gateway.set_pr_commits(
        200,
        vec![
            make_commit("f1", &["old-base"], &["blob-f1"]),
            make_commit("f2", &["f1"], &["blob-f2"]),
            make_commit("f3", &["f2"], &["blob-f3"]),
        ],
    );
    gateway.add_commit(make_commit("b1", &["main-tip"], &["blob-f1"]));
    gateway.add_commit(make_commit("b2", &["b1"], &["blob-f2"]));
    gateway.add_commit(make_commit("b3", &["b2"], &["blob-f3"]));
}

/// PR #300: two commits merged with merge commit `m300`, PR side second
pub fn setup_merge_pr(gateway: &MockGateway) {
    gateway.add_pull_request(merged_pr_details(300, "m300"));
    gateway.set_pr_commits(
        300,
        vec![
            make_commit("h1", &["old-base"], &["blob-h1"]),
            make_commit("h2", &["h1"], &["blob-h2"]),
        ],
    );
    gateway.add_commit(make_commit("main-tip", &["main-prev"], &["blob-main"]));
    gateway.add_commit(make_commit(
        "m300",
        &["main-tip", "h2"],
        &["blob-h1", "blob-h2"],
    ));
}

/// Progress sink recording every state it sees
///
/// Optionally cancels `token` on reaching a given state.
#[derive(Default)]
pub struct RecordingProgress {
    states: Mutex<Vec<RunState>>,
    runs: Mutex<Vec<CherryPickRun>>,
    messages: Mutex<Vec<String>>,
    cancel_at: Option<(RunState, CancellationToken)>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` as soon as the run reaches `state`
    pub fn cancelling_at(state: RunState, token: CancellationToken) -> Self {
        Self {
            cancel_at: Some((state, token)),
            ..Self::default()
        }
    }

    pub fn states(&self) -> Vec<RunState> {
        self.states.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Snapshot of the run as reported at `state`
    pub fn run_at(&self, state: RunState) -> Option<CherryPickRun> {
        self.runs
            .lock()
            .unwrap()
            .iter()
            .find(|run| run.state == state)
            .cloned()
    }

    /// Feature branch the failed run reported as left behind
    pub fn left_branch(&self) -> Option<String> {
        self.run_at(RunState::Failed)
            .and_then(|run| run.feature_branch)
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_state(&self, run: &CherryPickRun) {
        self.states.lock().unwrap().push(run.state);
        self.runs.lock().unwrap().push(run.clone());
        if let Some((state, token)) = &self.cancel_at
            && *state == run.state
        {
            token.cancel();
        }
    }

    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
