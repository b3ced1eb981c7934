//! Reconstruction of rebased commit sequences

use super::CommitLookup;
use crate::error::{Error, Result, ResultExt};
use crate::types::PullRequest;
use tracing::debug;

/// Recover the branch commits a rebase produced from the PR's commits
///
/// Walks first parents back from the merge commit, one step per PR
/// commit, checking that each branch commit carries the same changes as
/// its PR counterpart. Any mismatch or early root aborts the walk; there
/// is no partial replay. Returns branch SHAs oldest first.
pub async fn reconstruct_sequence(
    lookup: &mut CommitLookup<'_>,
    pr: &PullRequest,
) -> Result<Vec<String>> {
    if pr.head_commits.is_empty() {
        return Err(Error::EmptyCommitList(pr.number));
    }

    let mut branch_commit = lookup
        .get(&pr.merge_commit_sha)
        .await
        .with_context(|| format!("querying merge commit {}", pr.merge_commit_sha))?;

    let mut shas = Vec::with_capacity(pr.head_commits.len());

    for (index, pr_commit) in pr.head_commits.iter().enumerate().rev() {
        let pr_fp = pr_commit.fingerprint();
        let branch_fp = branch_commit.fingerprint();
        if pr_fp != branch_fp {
            return Err(Error::HistoryMismatch {
                pr_number: pr.number,
                index,
                pr_fingerprint: pr_fp.to_string(),
                branch_fingerprint: branch_fp.to_string(),
            });
        }
        debug!(index, sha = %branch_commit.sha, fingerprint = %pr_fp, "matched");

        shas.push(branch_commit.sha.clone());

        if index == 0 {
            break;
        }
        let Some(parent) = branch_commit.first_parent().map(str::to_string) else {
            return Err(Error::HistoryExhausted {
                pr_number: pr.number,
                index: index - 1,
                sha: branch_commit.sha,
            });
        };
        branch_commit = lookup
            .get(&parent)
            .await
            .with_context(|| format!("fetching branch commit {parent}"))?;
    }

    shas.reverse();
    Ok(shas)
}
