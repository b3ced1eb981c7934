//! Merge-mode classification and history replay
//!
//! GitHub does not say how a pull request was merged. The functions here
//! infer it from commit content and resolve the exact commits to replay:
//! 1. Fetch - load the PR and its authored commits (`fetch_pull_request`)
//! 2. Classify - squash, merge or rebase (`classify`)
//! 3. Resolve - patch-tree parent or rebased sequence (`resolve_replay`)

mod classify;
mod patch_tree;
mod rebase;

pub use classify::classify;
pub use patch_tree::{PatchTreeParent, resolve_patch_tree_parent};
pub use rebase::reconstruct_sequence;

use crate::error::{Error, Result, ResultExt};
use crate::platform::RepositoryGateway;
use crate::types::{Commit, MergeMode, PullRequest, ReplaySpec};
use std::collections::HashMap;
use tracing::{debug, info};

/// Memoising commit fetcher for a single run
///
/// Classification, patch-tree resolution and rebase reconstruction often
/// ask for the same merge commit; each SHA is fetched from the gateway
/// at most once.
pub struct CommitLookup<'a> {
    gateway: &'a dyn RepositoryGateway,
    cache: HashMap<String, Commit>,
    fetches: usize,
}

impl<'a> CommitLookup<'a> {
    /// Create an empty lookup over `gateway`
    pub fn new(gateway: &'a dyn RepositoryGateway) -> Self {
        Self {
            gateway,
            cache: HashMap::new(),
            fetches: 0,
        }
    }

    /// Fetch a commit, from cache when possible
    pub async fn get(&mut self, sha: &str) -> Result<Commit> {
        if let Some(commit) = self.cache.get(sha) {
            return Ok(commit.clone());
        }
        let commit = self.gateway.get_commit(sha).await?;
        self.fetches += 1;
        self.cache.insert(sha.to_string(), commit.clone());
        Ok(commit)
    }

    /// Number of gateway fetches performed so far
    pub const fn fetches(&self) -> usize {
        self.fetches
    }
}

/// Load a merged pull request and its authored commits
pub async fn fetch_pull_request(
    gateway: &dyn RepositoryGateway,
    number: u64,
) -> Result<PullRequest> {
    let details = gateway
        .get_pull_request(number)
        .await
        .with_context(|| format!("getting pull request #{number}"))?;

    if !details.merged {
        return Err(Error::NotMerged(number));
    }
    let merge_commit_sha = details.merge_commit_sha.ok_or(Error::NotMerged(number))?;

    let head_commits = gateway
        .list_pr_commits(number)
        .await
        .with_context(|| format!("reading commits from PR #{number}"))?;
    debug!(number, count = head_commits.len(), "read PR commits");

    let config = gateway.config();
    Ok(PullRequest {
        owner: config.owner.clone(),
        repo: config.repo.clone(),
        number,
        merge_commit_sha,
        head_commits,
        username: details.author,
        base_branch: details.base_ref,
        head_ref: details.head_ref,
        title: details.title,
        html_url: details.html_url,
    })
}

/// Classify a PR and resolve everything needed to replay it
pub async fn resolve_replay(lookup: &mut CommitLookup<'_>, pr: &PullRequest) -> Result<ReplaySpec> {
    let mode = classify(lookup, pr)
        .await
        .with_context(|| format!("getting merge mode for PR #{}", pr.number))?;

    let spec = match mode {
        MergeMode::Squash => ReplaySpec::Squash {
            commit: pr.merge_commit_sha.clone(),
        },
        MergeMode::Merge => {
            let parent = resolve_patch_tree_parent(lookup, pr)
                .await
                .context("searching for parent patch tree")?;
            ReplaySpec::Merge {
                commit: pr.merge_commit_sha.clone(),
                patch_parent: parent.index,
                mainline: parent.mainline(),
            }
        }
        MergeMode::Rebase => {
            let commits = reconstruct_sequence(lookup, pr)
                .await
                .with_context(|| format!("getting commits in rebase from PR #{}", pr.number))?;
            ReplaySpec::Rebase { commits }
        }
    };

    info!(
        pr_number = pr.number,
        mode = %spec.mode(),
        commits = spec.commits().len(),
        "resolved replay"
    );
    Ok(spec)
}
