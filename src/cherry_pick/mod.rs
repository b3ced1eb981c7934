//! Cherry-pick orchestration
//!
//! Drives one request through `Init → Fetching → Classifying →
//! BranchCreated → Replaying → Pushed → PrOpened → Done`, with `Failed`
//! reachable from any state. Steps run strictly in sequence: each one
//! needs the previous step's output.
//!
//! Failures are never rolled back. A feature branch that was created
//! stays in place (with any commits already applied) so it can be
//! inspected and finished or deleted by hand.

mod progress;
mod state;
mod template;

pub use progress::{NoopProgress, ProgressCallback};
pub use state::{CherryPickRun, RunState};
pub use template::{BRANCH_PREFIX, feature_branch_name, pr_body, pr_title};

use crate::config::CherryPickOptions;
use crate::error::{Error, Result, ResultExt};
use crate::platform::{RepositoryGateway, fork_remote_url};
use crate::replay::{CommitLookup, fetch_pull_request, resolve_replay};
use crate::repo::{LocalRepository, ReplayOptions};
use crate::types::{NewPullRequest, PullRequestRef, ReplaySpec};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct CherryPickOutcome {
    /// The pull request that was opened
    pub pull_request: PullRequestRef,
    /// Feature branch holding the replayed commits
    pub feature_branch: String,
    /// How the original PR was replayed
    pub replay: ReplaySpec,
}

/// Reproduces merged pull requests on other branches
///
/// Collaborators are injected; the picker owns no global state. Runs
/// against the same working tree must be serialized by the caller.
pub struct CherryPicker<'a> {
    gateway: &'a dyn RepositoryGateway,
    repo: &'a dyn LocalRepository,
    options: CherryPickOptions,
}

impl<'a> CherryPicker<'a> {
    /// Create a picker over the given gateway and working tree
    pub const fn new(
        gateway: &'a dyn RepositoryGateway,
        repo: &'a dyn LocalRepository,
        options: CherryPickOptions,
    ) -> Self {
        Self {
            gateway,
            repo,
            options,
        }
    }

    /// Cherry-pick PR `pr_number` onto `target_branch` and open a pull request
    ///
    /// Returns the first failure, wrapped with the step that produced it.
    pub async fn create_cherry_pick(
        &self,
        pr_number: u64,
        target_branch: &str,
        progress: &dyn ProgressCallback,
        cancel: &CancellationToken,
    ) -> Result<CherryPickOutcome> {
        let mut run = CherryPickRun::new(pr_number, target_branch);

        match self.drive(&mut run, progress, cancel).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                if let Some(branch) = &run.feature_branch {
                    warn!(
                        branch = %branch,
                        state = %run.state,
                        "feature branch left in place, inspect and delete it manually"
                    );
                }
                // Sinks read `feature_branch` off the failed run
                run.transition(RunState::Failed);
                progress.on_state(&run).await;
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        run: &mut CherryPickRun,
        progress: &dyn ProgressCallback,
        cancel: &CancellationToken,
    ) -> Result<CherryPickOutcome> {
        let pr_number = run.pr_number;
        let target_branch = run.target_branch.clone();

        // Init → Fetching
        check_cancelled(run, cancel)?;
        if let Some(sentinel) = self
            .repo
            .in_progress_operation()
            .context("verifying environment")?
        {
            return Err(Error::RebaseInProgress(sentinel));
        }
        advance(run, RunState::Fetching, progress).await;
        let pr = fetch_pull_request(self.gateway, pr_number).await?;

        // Fetching → Classifying
        check_cancelled(run, cancel)?;
        advance(run, RunState::Classifying, progress).await;
        let mut lookup = CommitLookup::new(self.gateway);
        let replay = resolve_replay(&mut lookup, &pr).await?;
        run.replay = Some(replay.clone());
        progress
            .on_message(&format!(
                "PR #{pr_number} was merged via {}, replaying {} commit(s)",
                replay.mode(),
                replay.commits().len()
            ))
            .await;

        // Classifying → BranchCreated
        check_cancelled(run, cancel)?;
        let branch = feature_branch_name(pr_number, chrono::Utc::now().timestamp());
        self.repo
            .checkout(&target_branch)
            .with_context(|| format!("switching to source branch {target_branch}"))?;
        self.repo
            .create_branch(&branch)
            .context("creating the feature branch")?;
        run.feature_branch = Some(branch.clone());
        self.repo
            .checkout(&branch)
            .context("switching to the feature branch")?;
        advance(run, RunState::BranchCreated, progress).await;

        // BranchCreated → Replaying
        check_cancelled(run, cancel)?;
        advance(run, RunState::Replaying, progress).await;
        self.replay(run, &branch, &replay)?;

        // Replaying → Pushed
        check_cancelled(run, cancel)?;
        let (remote, head) = self
            .push_target(&branch)
            .context("preparing push remote")?;
        self.repo
            .push(&branch, &remote)
            .context("pushing branch to git remote")?;
        advance(run, RunState::Pushed, progress).await;

        // Pushed → PrOpened
        check_cancelled(run, cancel)?;
        let new_pr = NewPullRequest {
            head,
            base: target_branch.clone(),
            title: pr_title(pr_number, &target_branch),
            body: pr_body(&pr, &target_branch),
            maintainer_can_modify: true,
        };
        let created = self
            .gateway
            .create_pull_request(&new_pr)
            .await
            .context("creating pull request in github")?;
        info!(number = created.number, url = %created.html_url, "created pull request");
        run.pull_request = Some(created.clone());
        advance(run, RunState::PrOpened, progress).await;

        // PrOpened → Done
        advance(run, RunState::Done, progress).await;
        Ok(CherryPickOutcome {
            pull_request: created,
            feature_branch: branch,
            replay,
        })
    }

    /// Apply the replay and stop hard on unmerged entries
    fn replay(&self, run: &mut CherryPickRun, branch: &str, spec: &ReplaySpec) -> Result<()> {
        let commits = spec.commits();
        let options = ReplayOptions {
            mainline: spec.mainline(),
            preference: self.options.conflict_preference,
        };
        info!(
            count = commits.len(),
            branch,
            mode = %spec.mode(),
            "cherry picking commits"
        );

        let picked = self.repo.cherry_pick(&commits, options);

        let (conflicted, files) = match self.repo.has_conflicts() {
            Ok(status) => status,
            Err(status_err) => {
                return Err(match picked {
                    Err(pick_err) => status_err.context(format!(
                        "checking for conflicts after failed cherry-pick ({pick_err})"
                    )),
                    Ok(()) => status_err.context("checking for conflicts"),
                });
            }
        };
        if conflicted {
            run.has_conflicts = true;
            return Err(Error::CherryPickConflict {
                branch: branch.to_string(),
                commits,
                files,
            });
        }

        picked.with_context(|| {
            format!(
                "cherry-picking pull request #{} of type {}",
                run.pr_number,
                spec.mode()
            )
        })
    }

    /// Remote to push to and the PR head ref
    fn push_target(&self, branch: &str) -> Result<(String, String)> {
        let Some(owner) = &self.options.fork_owner else {
            return Ok((self.options.remote.clone(), branch.to_string()));
        };

        if !self.repo.has_remote(owner)? {
            let main_url = self.repo.main_remote_url()?;
            let fork_url = fork_remote_url(&main_url, owner)?;
            self.repo.add_remote(owner, &fork_url)?;
        }
        Ok((owner.clone(), format!("{owner}:{branch}")))
    }
}

async fn advance(run: &mut CherryPickRun, next: RunState, progress: &dyn ProgressCallback) {
    run.transition(next);
    progress.on_state(run).await;
}

fn check_cancelled(run: &CherryPickRun, cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled {
            feature_branch: run.feature_branch.clone(),
        });
    }
    Ok(())
}
