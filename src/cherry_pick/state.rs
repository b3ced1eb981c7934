//! Run state for one cherry-pick

use crate::types::{PullRequestRef, ReplaySpec};
use tracing::info;

/// Stage of a cherry-pick run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing done yet
    Init,
    /// Loading the PR and its commits
    Fetching,
    /// Working out how the PR was merged
    Classifying,
    /// Feature branch created from the target branch
    BranchCreated,
    /// Cherry-picking onto the feature branch
    Replaying,
    /// Feature branch pushed
    Pushed,
    /// Pull request opened
    PrOpened,
    /// Finished successfully
    Done,
    /// Stopped on an error
    Failed,
}

impl RunState {
    /// Whether the working tree may have been changed by the time this state is reached
    pub const fn touches_working_tree(self) -> bool {
        matches!(
            self,
            Self::BranchCreated | Self::Replaying | Self::Pushed | Self::PrOpened | Self::Done
        )
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Fetching => "fetching",
            Self::Classifying => "classifying",
            Self::BranchCreated => "branch created",
            Self::Replaying => "replaying",
            Self::Pushed => "pushed",
            Self::PrOpened => "PR opened",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Transient state of one `create_cherry_pick` invocation
///
/// Created at the start of a run and dropped at its end. Never persisted.
#[derive(Debug, Clone)]
pub struct CherryPickRun {
    /// PR being cherry-picked
    pub pr_number: u64,
    /// Branch the changes are replayed onto
    pub target_branch: String,
    /// Current stage
    pub state: RunState,
    /// Feature branch, once created
    pub feature_branch: Option<String>,
    /// Resolved replay, once classified
    pub replay: Option<ReplaySpec>,
    /// Whether replay stopped on conflicts
    pub has_conflicts: bool,
    /// Opened pull request, once created
    pub pull_request: Option<PullRequestRef>,
}

impl CherryPickRun {
    /// Start a run
    pub fn new(pr_number: u64, target_branch: &str) -> Self {
        Self {
            pr_number,
            target_branch: target_branch.to_string(),
            state: RunState::Init,
            feature_branch: None,
            replay: None,
            has_conflicts: false,
            pull_request: None,
        }
    }

    /// Move to `next`
    pub fn transition(&mut self, next: RunState) {
        info!(pr_number = self.pr_number, from = %self.state, to = %next, "state transition");
        self.state = next;
    }
}
