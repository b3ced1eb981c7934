//! Core types for pr-cherrypick

use crate::fingerprint::{Fingerprint, fingerprint};
use serde::{Deserialize, Serialize};

/// A file touched by a commit, relative to its first parent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChangedFile {
    /// Path of the file in the repository
    pub path: String,
    /// Blob SHA of the file content after the commit
    pub blob_sha: String,
}

impl ChangedFile {
    /// Build a changed-file entry
    pub fn new(path: impl Into<String>, blob_sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            blob_sha: blob_sha.into(),
        }
    }
}

/// A commit as reported by the hosting platform
///
/// Immutable once fetched. Parents are ordered: 0 parents is a root commit,
/// 1 an ordinary commit, 2 or more a merge commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA (hex)
    pub sha: String,
    /// SHA of the commit's root tree, when known
    pub tree_sha: Option<String>,
    /// Parent commit SHAs, first parent first
    pub parents: Vec<String>,
    /// Files changed relative to the first parent
    pub files: Vec<ChangedFile>,
}

impl Commit {
    /// Order-independent hash of the changed files
    ///
    /// Commits rewritten by the platform keep this value even though their
    /// SHA changes.
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(&self.files)
    }

    /// Whether this commit has more than one parent
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// First parent SHA, if any
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

/// Pull request metadata as returned by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Login of the PR author
    pub author: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// Whether the PR has been merged
    pub merged: bool,
    /// The SHA the platform reports as "where this PR landed"
    ///
    /// A real merge commit only when the PR was merged with a merge commit;
    /// an ordinary single-parent commit for squash and rebase merges.
    pub merge_commit_sha: Option<String>,
    /// Web URL for the PR
    pub html_url: String,
}

/// A merged pull request together with its authored commits
#[derive(Debug, Clone)]
pub struct PullRequest {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub number: u64,
    /// SHA of the commit where the PR landed
    pub merge_commit_sha: String,
    /// Commits as authored in the PR, oldest first
    pub head_commits: Vec<Commit>,
    /// Login of the PR author
    pub username: String,
    /// Branch the PR was merged into
    pub base_branch: String,
    /// Branch the PR was opened from
    pub head_ref: String,
    /// Title of the original PR
    pub title: String,
    /// Web URL of the original PR
    pub html_url: String,
}

impl PullRequest {
    /// The last commit authored in the PR
    pub fn last_head_commit(&self) -> Option<&Commit> {
        self.head_commits.last()
    }
}

/// A pull request created by a cherry-pick run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestRef {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Head branch (possibly `owner:branch` for forks)
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
}

/// Parameters for opening a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Head ref (`branch` or `owner:branch`)
    pub head: String,
    /// Base branch
    pub base: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
    /// Allow maintainers of the base repository to push to the head branch
    pub maintainer_can_modify: bool,
}

/// How a pull request was landed on its base branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeMode {
    /// All commits combined into one new commit
    Squash,
    /// A real merge commit with two or more parents
    Merge,
    /// Each commit rewritten onto the base branch
    Rebase,
}

impl std::fmt::Display for MergeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// Everything the replay step needs, resolved from the merge mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaySpec {
    /// Cherry-pick the single squashed commit
    Squash {
        /// The squashed commit
        commit: String,
    },
    /// Cherry-pick the merge commit against one of its parents
    Merge {
        /// The merge commit
        commit: String,
        /// 0-based index of the parent holding the PR's tree
        patch_parent: usize,
        /// 1-based parent number passed to `git cherry-pick -m`
        mainline: u32,
    },
    /// Cherry-pick the rebased branch commits, oldest first
    Rebase {
        /// Branch commit SHAs in authorship order
        commits: Vec<String>,
    },
}

impl ReplaySpec {
    /// The merge mode this replay was resolved from
    pub const fn mode(&self) -> MergeMode {
        match self {
            Self::Squash { .. } => MergeMode::Squash,
            Self::Merge { .. } => MergeMode::Merge,
            Self::Rebase { .. } => MergeMode::Rebase,
        }
    }

    /// Commits to cherry-pick, in order
    pub fn commits(&self) -> Vec<String> {
        match self {
            Self::Squash { commit } | Self::Merge { commit, .. } => vec![commit.clone()],
            Self::Rebase { commits } => commits.clone(),
        }
    }

    /// Mainline parent for merge-commit replay
    pub const fn mainline(&self) -> Option<u32> {
        match self {
            Self::Merge { mainline, .. } => Some(*mainline),
            Self::Squash { .. } | Self::Rebase { .. } => None,
        }
    }
}

/// Repository coordinates on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}
