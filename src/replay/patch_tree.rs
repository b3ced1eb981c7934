//! Patch-tree resolution for true merge commits

use super::CommitLookup;
use crate::error::{Error, Result, ResultExt};
use crate::types::PullRequest;
use tracing::{debug, info};

/// The parent of a merge commit that carries the PR's own history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchTreeParent {
    /// 0-based index of the parent whose changes match the PR's last commit
    pub index: usize,
    /// Number of parents of the merge commit
    pub parent_count: usize,
}

impl PatchTreeParent {
    /// 1-based parent number for `git cherry-pick -m`
    ///
    /// git diffs the merge commit against the mainline parent, which must
    /// be the branch side: the first parent that is not the PR side.
    pub fn mainline(&self) -> u32 {
        let mainline = (0..self.parent_count)
            .find(|&i| i != self.index)
            .unwrap_or(0);
        u32::try_from(mainline + 1).unwrap_or(1)
    }
}

/// Find the merge-commit parent whose changes match the PR's last commit
pub async fn resolve_patch_tree_parent(
    lookup: &mut CommitLookup<'_>,
    pr: &PullRequest,
) -> Result<PatchTreeParent> {
    let Some(last) = pr.last_head_commit() else {
        return Err(Error::EmptyCommitList(pr.number));
    };
    let pr_fp = last.fingerprint();

    let merge_commit = lookup
        .get(&pr.merge_commit_sha)
        .await
        .with_context(|| format!("querying merge commit {}", pr.merge_commit_sha))?;
    let parent_count = merge_commit.parents.len();

    for (index, parent_sha) in merge_commit.parents.iter().enumerate() {
        let parent = lookup
            .get(parent_sha)
            .await
            .with_context(|| format!("querying parent commit {parent_sha}"))?;
        let parent_fp = parent.fingerprint();
        debug!(index, pr = %pr_fp, parent = %parent_fp, "comparing parent");

        if parent_fp == pr_fp {
            info!(index, "PR tree found on merge parent");
            return Ok(PatchTreeParent {
                index,
                parent_count,
            });
        }
    }

    Err(Error::PatchTreeNotFound {
        pr_number: pr.number,
        parent_count,
    })
}
