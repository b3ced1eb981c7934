//! `LocalRepository` backed by the git CLI

use super::{LocalRepository, ReplayOptions, parse_unmerged};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Files git leaves in its directory while an operation is unfinished
const IN_PROGRESS_SENTINELS: [&str; 4] =
    ["rebase-apply", "rebase-merge", "MERGE_HEAD", "CHERRY_PICK_HEAD"];

/// Remotes tried, in order, by [`LocalRepository::main_remote_url`]
const MAIN_REMOTES: [&str; 2] = ["upstream", "origin"];

/// A git working tree driven through the `git` binary
///
/// gix locates the repository and reads remote configuration; history
/// rewriting (checkout, cherry-pick, push) goes through the CLI, which
/// honours the user's identity and hooks.
#[derive(Debug, Clone)]
pub struct GitRepository {
    workdir: PathBuf,
    git_dir: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = gix::discover(path)
            .map_err(|e| Error::Git(format!("failed to open repository at {}: {e}", path.display())))?;
        let git_dir = repo.git_dir().to_path_buf();
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::Git(format!("{} is a bare repository", path.display())))?;
        debug!(workdir = %workdir.display(), "opened repository");
        Ok(Self { workdir, git_dir })
    }

    /// Root of the working tree
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.workdir);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    /// Run git, returning stdout on success
    fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = self.command();
        cmd.args(args);
        let rendered = format!("{cmd:?}");
        debug!(command = %rendered, "running git");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(Error::Git(format!(
                "{rendered} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        let repo = gix::open(&self.workdir)
            .map_err(|e| Error::Git(format!("failed to open repository: {e}")))?;
        let Some(remote) = repo.try_find_remote(name) else {
            return Ok(None);
        };
        let remote = remote.map_err(|e| Error::Git(format!("reading remote {name}: {e}")))?;
        Ok(remote
            .url(gix::remote::Direction::Fetch)
            .map(|url| url.to_bstring().to_string()))
    }
}

impl LocalRepository for GitRepository {
    fn in_progress_operation(&self) -> Result<Option<PathBuf>> {
        Ok(IN_PROGRESS_SENTINELS
            .iter()
            .map(|s| self.git_dir.join(s))
            .find(|p| p.exists()))
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        info!(reference, "checking out");
        self.run(["checkout", reference])
            .map(drop)
            .map_err(|e| e.context(format!("switching to {reference}")))
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        info!(branch = name, "creating branch");
        self.run(["branch", name])
            .map(drop)
            .map_err(|e| e.context(format!("creating branch {name}")))
    }

    fn cherry_pick(&self, shas: &[String], options: ReplayOptions) -> Result<()> {
        info!(count = shas.len(), mainline = ?options.mainline, "cherry-picking");
        let mut args = vec!["cherry-pick".to_string()];
        args.extend(options.to_args());
        args.extend(shas.iter().cloned());
        self.run(&args).map(drop)
    }

    fn has_conflicts(&self) -> Result<(bool, Vec<String>)> {
        let status = self.run(["status", "--porcelain"])?;
        let files = parse_unmerged(&status);
        if !files.is_empty() {
            info!(count = files.len(), "unmerged paths in working tree");
        }
        Ok((!files.is_empty(), files))
    }

    fn push(&self, branch: &str, remote: &str) -> Result<()> {
        info!(branch, remote, "pushing");
        self.run(["push", remote, branch])
            .map(drop)
            .map_err(|e| e.context(format!("pushing {branch} to {remote}")))
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        info!(name, url, "adding remote");
        self.run(["remote", "add", name, url])
            .map(drop)
            .map_err(|e| e.context(format!("adding remote {name}")))
    }

    fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.remote_url(name)?.is_some())
    }

    fn main_remote_url(&self) -> Result<String> {
        for name in MAIN_REMOTES {
            if let Some(url) = self.remote_url(name)? {
                return Ok(url);
            }
        }
        Err(Error::RemoteNotFound(MAIN_REMOTES.join(" or ")))
    }
}
