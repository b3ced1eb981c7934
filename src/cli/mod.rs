//! Command-line interface

pub mod cherry_pick;
pub mod context;
pub mod style;

use async_trait::async_trait;
use indicatif::ProgressBar;
use pr_cherrypick::cherry_pick::{CherryPickRun, ProgressCallback, RunState};
use std::time::Duration;
use style::{Stylize, check, spinner_style};

/// Progress reporter drawing a spinner on stderr
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Create a spinner that ticks until the run finishes
    pub fn spinner() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_state(&self, run: &CherryPickRun) {
        match run.state {
            RunState::Init => {}
            RunState::Fetching => self
                .spinner
                .set_message(format!("Fetching PR #{}...", run.pr_number)),
            RunState::Classifying => self.spinner.set_message("Classifying merge mode..."),
            RunState::BranchCreated => {
                if let Some(branch) = &run.feature_branch {
                    self.spinner
                        .println(format!("{} Created {}", check(), branch.accent()));
                }
            }
            RunState::Replaying => match &run.replay {
                Some(replay) => self.spinner.set_message(format!(
                    "Cherry-picking {} commit(s) onto {} ({})...",
                    replay.commits().len(),
                    run.target_branch.emphasis(),
                    replay.mode()
                )),
                None => self.spinner.set_message(format!(
                    "Cherry-picking onto {}...",
                    run.target_branch.emphasis()
                )),
            },
            RunState::Pushed => {
                self.spinner.println(format!("{} Pushed", check()));
                self.spinner.set_message("Opening pull request...");
            }
            RunState::PrOpened => {
                if let Some(pr) = &run.pull_request {
                    self.spinner
                        .println(format!("{} Opened PR #{}", check(), pr.number));
                }
            }
            RunState::Done => self.spinner.finish_and_clear(),
            RunState::Failed => {
                self.spinner.finish_and_clear();
                if let Some(branch) = &run.feature_branch {
                    anstream::eprintln!(
                        "{}",
                        format!("Feature branch {branch} was left in place for manual resolution.")
                            .warn()
                    );
                }
            }
        }
    }

    async fn on_message(&self, message: &str) {
        self.spinner.println(message.muted());
    }
}
