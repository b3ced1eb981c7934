//! Repository gateway for the hosting platform
//!
//! Fetches pull requests and commits and opens new pull requests. Holds
//! no classification logic of its own.

mod detection;
mod github;

pub use detection::{detect_repo, fork_remote_url, parse_repo_info};
pub use github::GitHubGateway;

use crate::error::Result;
use crate::types::{Commit, NewPullRequest, PlatformConfig, PullRequestDetails, PullRequestRef};
use async_trait::async_trait;

/// Platform operations consumed by the cherry-pick engine
///
/// Implementations are bound to one repository through [`PlatformConfig`].
/// No method retries; retry policy belongs to the implementation, not
/// to callers.
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Fetch pull request metadata
    ///
    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) if the PR
    /// does not exist.
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails>;

    /// Fetch a single commit with its parents and changed files
    ///
    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) if the
    /// SHA is unknown.
    async fn get_commit(&self, sha: &str) -> Result<Commit>;

    /// List the commits authored in a PR, oldest first, with changed files
    async fn list_pr_commits(&self, number: u64) -> Result<Vec<Commit>>;

    /// Open a new pull request
    async fn create_pull_request(&self, pr: &NewPullRequest) -> Result<PullRequestRef>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
