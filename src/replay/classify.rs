//! Merge-mode classification

use super::CommitLookup;
use crate::error::{Error, Result, ResultExt};
use crate::types::{MergeMode, PullRequest};
use tracing::info;

/// Decide how a pull request was merged
///
/// - A merge commit with more than one parent is a true merge.
/// - A single-commit PR counts as squashed. Squash and rebase of one
///   commit cannot be told apart by content, and replaying one commit is
///   the same either way.
/// - Otherwise the PR was rebased if the landed commit carries the same
///   changes as the last authored commit, and squashed if it does not.
pub async fn classify(lookup: &mut CommitLookup<'_>, pr: &PullRequest) -> Result<MergeMode> {
    let Some(last) = pr.last_head_commit() else {
        return Err(Error::EmptyCommitList(pr.number));
    };

    let merge_commit = lookup
        .get(&pr.merge_commit_sha)
        .await
        .with_context(|| format!("querying merge commit {}", pr.merge_commit_sha))?;

    if merge_commit.is_merge() {
        info!(pr_number = pr.number, "merged via a merge commit");
        return Ok(MergeMode::Merge);
    }

    if pr.head_commits.len() == 1 {
        info!(pr_number = pr.number, "single commit PR, treating as squash");
        return Ok(MergeMode::Squash);
    }

    let merge_fp = merge_commit.fingerprint();
    let pr_fp = last.fingerprint();
    info!(merge = %merge_fp, pr = %pr_fp, "comparing change trees");

    if merge_fp == pr_fp {
        info!(pr_number = pr.number, "merged via rebase");
        Ok(MergeMode::Rebase)
    } else {
        info!(pr_number = pr.number, "merged via squash");
        Ok(MergeMode::Squash)
    }
}
