//! Local working-tree operations
//!
//! The orchestrator is the only caller that mutates the working tree, and
//! it does so strictly in order: branch, replay, push.

mod git;

pub use git::GitRepository;

use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Side to favour when a cherry-pick hunk conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPreference {
    /// Prefer the incoming (cherry-picked) change
    Theirs,
    /// Prefer the target branch content
    Ours,
}

impl ConflictPreference {
    /// Value passed to `-X`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Theirs => "theirs",
            Self::Ours => "ours",
        }
    }
}

impl std::fmt::Display for ConflictPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one `git cherry-pick` invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// 1-based mainline parent for merge commits (`-m`)
    pub mainline: Option<u32>,
    /// Uniform conflict preference for the whole run
    pub preference: Option<ConflictPreference>,
}

impl ReplayOptions {
    /// Arguments following `cherry-pick`, before the commit list
    pub fn to_args(self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(m) = self.mainline {
            args.push("-m".to_string());
            args.push(m.to_string());
        }
        if let Some(pref) = self.preference {
            args.push("--strategy=recursive".to_string());
            args.push("-X".to_string());
            args.push(pref.as_str().to_string());
        }
        args
    }
}

/// Porcelain v1 status codes for unmerged entries
const UNMERGED_CODES: [&str; 7] = ["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

/// Unmerged paths in `git status --porcelain` output
///
/// Staged or modified entries (`M`, `A`, `??`) are never conflicts.
pub fn parse_unmerged(porcelain: &str) -> Vec<String> {
    porcelain
        .lines()
        .filter_map(|line| {
            let code = line.get(..2)?;
            let is_unmerged = code.starts_with('U') || UNMERGED_CODES.contains(&code);
            is_unmerged.then(|| line.get(3..).unwrap_or_default().to_string())
        })
        .collect()
}

/// Working-tree operations consumed by the orchestrator
pub trait LocalRepository: Send + Sync {
    /// Sentinel path of a rebase, merge or cherry-pick already in progress
    fn in_progress_operation(&self) -> Result<Option<PathBuf>>;

    /// Check out an existing branch or ref
    fn checkout(&self, reference: &str) -> Result<()>;

    /// Create a branch at the current HEAD
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Cherry-pick commits, in order, onto the current branch
    fn cherry_pick(&self, shas: &[String], options: ReplayOptions) -> Result<()>;

    /// Whether the working tree has unmerged entries, and which paths
    fn has_conflicts(&self) -> Result<(bool, Vec<String>)>;

    /// Push a branch to a remote
    fn push(&self, branch: &str, remote: &str) -> Result<()>;

    /// Add a remote
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Whether a remote with this name exists
    fn has_remote(&self, name: &str) -> Result<bool>;

    /// URL of `upstream`, or of `origin` when there is no `upstream`
    fn main_remote_url(&self) -> Result<String>;
}
