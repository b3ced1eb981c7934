//! cherrypick - reproduce a merged GitHub pull request on another branch

mod cli;

use anstream::{eprintln, println};
use clap::Parser;
use cli::style::Stylize;
use pr_cherrypick::config::Overrides;
use pr_cherrypick::repo::ConflictPreference;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Cherry-pick a merged pull request onto another branch
///
/// Works out whether the PR was squashed, merged or rebased, replays the
/// matching commits on a new branch and opens a pull request for it.
#[derive(Parser, Debug)]
#[command(name = "cherrypick", version, about, long_about = None)]
struct Cli {
    /// Number of the merged pull request
    pr_number: u64,

    /// Branch to cherry-pick onto
    branch: String,

    /// Path to the repository
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Remote to push the feature branch to
    #[arg(long)]
    remote: Option<String>,

    /// Push to this user's fork and open the PR from it
    #[arg(long)]
    fork_owner: Option<String>,

    /// Resolve conflicting hunks in favour of one side
    #[arg(long, value_enum)]
    prefer: Option<ConflictPreference>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pr_cherrypick=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = Overrides {
        remote: cli.remote,
        fork_owner: cli.fork_owner,
        conflict_preference: cli.prefer,
    };

    match cli::cherry_pick::run_cherry_pick(&cli.path, cli.pr_number, &cli.branch, overrides)
        .await
    {
        Ok(outcome) => {
            eprintln!(
                "{} Cherry-picked #{} onto {} via {}",
                cli::style::check(),
                cli.pr_number,
                cli.branch.accent(),
                outcome.replay.mode()
            );
            println!("{}", outcome.pull_request.html_url);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
