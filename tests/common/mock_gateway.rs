//! Mock repository gateway for testing

#![allow(dead_code)]

use async_trait::async_trait;
use pr_cherrypick::error::{Error, Result};
use pr_cherrypick::platform::RepositoryGateway;
use pr_cherrypick::types::{
    Commit, NewPullRequest, PlatformConfig, PullRequestDetails, PullRequestRef,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory gateway with call tracking
///
/// Features:
/// - Commits keyed by SHA, PR details and authored commits keyed by number
/// - Auto-incrementing numbers for created PRs
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockGateway {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    pull_requests: Mutex<HashMap<u64, PullRequestDetails>>,
    commits: Mutex<HashMap<String, Commit>>,
    pr_commits: Mutex<HashMap<u64, Vec<Commit>>>,
    // Call tracking
    get_pull_request_calls: Mutex<Vec<u64>>,
    get_commit_calls: Mutex<Vec<String>>,
    list_pr_commits_calls: Mutex<Vec<u64>>,
    create_pr_calls: Mutex<Vec<NewPullRequest>>,
    // Error injection
    error_on_get_commit: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
}

impl MockGateway {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1000),
            pull_requests: Mutex::new(HashMap::new()),
            commits: Mutex::new(HashMap::new()),
            pr_commits: Mutex::new(HashMap::new()),
            get_pull_request_calls: Mutex::new(Vec::new()),
            get_commit_calls: Mutex::new(Vec::new()),
            list_pr_commits_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            error_on_get_commit: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make every `get_commit` return an error
    pub fn fail_get_commit(&self, msg: &str) {
        *self.error_on_get_commit.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pull_request` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Register PR metadata
    pub fn add_pull_request(&self, details: PullRequestDetails) {
        self.pull_requests
            .lock()
            .unwrap()
            .insert(details.number, details);
    }

    /// Register a commit by SHA
    pub fn add_commit(&self, commit: Commit) {
        self.commits
            .lock()
            .unwrap()
            .insert(commit.sha.clone(), commit);
    }

    /// Register the authored commits of a PR (also fetchable by SHA)
    pub fn set_pr_commits(&self, number: u64, commits: Vec<Commit>) {
        for c in &commits {
            self.add_commit(c.clone());
        }
        self.pr_commits.lock().unwrap().insert(number, commits);
    }

    // === Call tracking getters ===

    pub fn get_pull_request_calls(&self) -> Vec<u64> {
        self.get_pull_request_calls.lock().unwrap().clone()
    }

    pub fn get_commit_calls(&self) -> Vec<String> {
        self.get_commit_calls.lock().unwrap().clone()
    }

    pub fn list_pr_commits_calls(&self) -> Vec<u64> {
        self.list_pr_commits_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<NewPullRequest> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Number of times `sha` was fetched
    pub fn commit_fetch_count(&self, sha: &str) -> usize {
        self.get_commit_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|s| *s == sha)
            .count()
    }

    /// Whether the gateway was touched at all
    pub fn was_called(&self) -> bool {
        !self.get_pull_request_calls.lock().unwrap().is_empty()
            || !self.get_commit_calls.lock().unwrap().is_empty()
            || !self.list_pr_commits_calls.lock().unwrap().is_empty()
            || !self.create_pr_calls.lock().unwrap().is_empty()
    }

    // === Assertion helpers ===

    /// Assert exactly one PR was created from `head` onto `base`
    pub fn assert_created_pr(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert_eq!(calls.len(), 1, "expected one created PR, got {calls:?}");
        assert_eq!(calls[0].head, head, "PR head mismatch");
        assert_eq!(calls[0].base, base, "PR base mismatch");
    }

    /// Assert no PR was created
    pub fn assert_no_pr_created(&self) {
        let calls = self.get_create_pr_calls();
        assert!(calls.is_empty(), "expected no created PR, got {calls:?}");
    }
}

#[async_trait]
impl RepositoryGateway for MockGateway {
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        self.get_pull_request_calls.lock().unwrap().push(number);
        self.pull_requests
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("pull request #{number}")))
    }

    async fn get_commit(&self, sha: &str) -> Result<Commit> {
        self.get_commit_calls.lock().unwrap().push(sha.to_string());
        if let Some(msg) = self.error_on_get_commit.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        self.commits
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("commit {sha}")))
    }

    async fn list_pr_commits(&self, number: u64) -> Result<Vec<Commit>> {
        self.list_pr_commits_calls.lock().unwrap().push(number);
        Ok(self
            .pr_commits
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_pull_request(&self, pr: &NewPullRequest) -> Result<PullRequestRef> {
        self.create_pr_calls.lock().unwrap().push(pr.clone());
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequestRef {
            number,
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.config.owner, self.config.repo
            ),
            head_ref: pr.head.clone(),
            base_ref: pr.base.clone(),
        })
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
