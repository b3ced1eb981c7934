//! Error types for pr-cherrypick

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while classifying and replaying a pull request
#[derive(Debug, Error)]
pub enum Error {
    /// The platform has no record of the requested object
    #[error("not found: {0}")]
    NotFound(String),

    /// The pull request was never merged, so there is nothing to replay
    #[error("pull request #{0} has not been merged")]
    NotMerged(u64),

    /// The pull request reports no authored commits
    #[error("pull request #{0} has no commits")]
    EmptyCommitList(u64),

    /// None of the merge commit's parents carries the PR's tree
    #[error(
        "unable to find patch tree of the merge commit of PR #{pr_number} among {parent_count} parents"
    )]
    PatchTreeNotFound {
        /// Pull request number
        pr_number: u64,
        /// Number of parents the merge commit has
        parent_count: usize,
    },

    /// A branch commit does not match the corresponding PR commit
    #[error(
        "history mismatch for PR #{pr_number} at commit #{index}: PR {pr_fingerprint} vs branch {branch_fingerprint}"
    )]
    HistoryMismatch {
        /// Pull request number
        pr_number: u64,
        /// 0-based index of the PR commit that failed to match
        index: usize,
        /// Fingerprint of the PR commit
        pr_fingerprint: String,
        /// Fingerprint of the branch commit
        branch_fingerprint: String,
    },

    /// Branch history ran out before every PR commit was matched
    #[error(
        "branch history exhausted for PR #{pr_number}: commit {sha} has no parent but PR commit #{index} is still unmatched"
    )]
    HistoryExhausted {
        /// Pull request number
        pr_number: u64,
        /// 0-based index of the next PR commit that had no branch counterpart
        index: usize,
        /// Root commit where the walk stopped
        sha: String,
    },

    /// A rebase, merge or cherry-pick is already in progress in the working tree
    #[error("an operation is already in progress in the working tree ({})", .0.display())]
    RebaseInProgress(PathBuf),

    /// Cherry-picking left unmerged entries in the working tree
    #[error("conflicts found while cherry-picking {} commit(s) onto {branch}: {}", .commits.len(), .files.join(", "))]
    CherryPickConflict {
        /// Feature branch left in place for manual resolution
        branch: String,
        /// Commits that were being replayed
        commits: Vec<String>,
        /// Unmerged paths
        files: Vec<String>,
    },

    /// The run was cancelled
    #[error("cancelled{}", .feature_branch.as_ref().map(|b| format!(" (feature branch {b} may hold partial changes)")).unwrap_or_default())]
    Cancelled {
        /// Feature branch created before cancellation, if any
        feature_branch: Option<String>,
    },

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error
    #[error("platform error: {0}")]
    Platform(String),

    /// A git command failed
    #[error("git error: {0}")]
    Git(String),

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote not found
    #[error("remote '{0}' not found")]
    RemoteNotFound(String),

    /// No remote points at a supported platform
    #[error("no supported remote found (expected a GitHub URL)")]
    NoSupportedRemotes,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error wrapped with the operation that produced it
    #[error("{context}: {source}")]
    Context {
        /// Operation being performed
        context: String,
        /// Underlying error
        #[source]
        source: Box<Self>,
    },
}

impl Error {
    /// Wrap this error with a description of the failing operation
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every context layer removed
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        if let octocrab::Error::GitHub { source, .. } = &err
            && source.status_code.as_u16() == 404
        {
            return Self::NotFound(source.message.clone());
        }
        Self::GitHubApi(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result type alias for pr-cherrypick
pub type Result<T> = std::result::Result<T, Error>;

/// Context helpers for results crossing a component boundary
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a fixed description
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Wrap the error, if any, with a lazily built description
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Self {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, S>(self, f: F) -> Self
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
