//! Mock working tree for testing

#![allow(dead_code)]

use pr_cherrypick::error::{Error, Result};
use pr_cherrypick::repo::{LocalRepository, ReplayOptions};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// A recorded working-tree operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    Checkout(String),
    CreateBranch(String),
    CherryPick {
        shas: Vec<String>,
        options: ReplayOptions,
    },
    Push {
        branch: String,
        remote: String,
    },
    AddRemote {
        name: String,
        url: String,
    },
}

/// In-memory `LocalRepository` that records every mutating call
pub struct MockRepo {
    calls: Mutex<Vec<RepoCall>>,
    remotes: Mutex<HashMap<String, String>>,
    in_progress: Mutex<Option<PathBuf>>,
    conflict_files: Mutex<Vec<String>>,
    // Error injection
    error_on_cherry_pick: Mutex<Option<String>>,
    error_on_push: Mutex<Option<String>>,
    error_on_status: Mutex<Option<String>>,
}

impl MockRepo {
    /// A clean working tree with an `origin` remote
    pub fn new() -> Self {
        let repo = Self {
            calls: Mutex::new(Vec::new()),
            remotes: Mutex::new(HashMap::new()),
            in_progress: Mutex::new(None),
            conflict_files: Mutex::new(Vec::new()),
            error_on_cherry_pick: Mutex::new(None),
            error_on_push: Mutex::new(None),
            error_on_status: Mutex::new(None),
        };
        repo.set_remote("origin", "git@github.com:acme/widgets.git");
        repo
    }

    pub fn set_remote(&self, name: &str, url: &str) {
        self.remotes
            .lock()
            .unwrap()
            .insert(name.to_string(), url.to_string());
    }

    /// Pretend an unfinished operation left `sentinel` in the git dir
    pub fn set_in_progress(&self, sentinel: &str) {
        *self.in_progress.lock().unwrap() = Some(PathBuf::from(sentinel));
    }

    /// Report these paths as unmerged after a cherry-pick
    pub fn set_conflicts(&self, files: &[&str]) {
        *self.conflict_files.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    // === Error injection methods ===

    pub fn fail_cherry_pick(&self, msg: &str) {
        *self.error_on_cherry_pick.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_push(&self, msg: &str) {
        *self.error_on_push.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_status(&self, msg: &str) {
        *self.error_on_status.lock().unwrap() = Some(msg.to_string());
    }

    // === Call tracking getters ===

    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cherry_pick_calls(&self) -> Vec<(Vec<String>, ReplayOptions)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::CherryPick { shas, options } => Some((shas, options)),
                _ => None,
            })
            .collect()
    }

    pub fn push_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::Push { branch, remote } => Some((branch, remote)),
                _ => None,
            })
            .collect()
    }

    pub fn created_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::CreateBranch(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    // === Assertion helpers ===

    /// Assert the working tree was never touched
    pub fn assert_untouched(&self) {
        let calls = self.calls();
        assert!(calls.is_empty(), "expected no repository calls, got {calls:?}");
    }

    /// Assert exactly one cherry-pick of `shas` was attempted
    pub fn assert_picked(&self, shas: &[&str]) {
        let picks = self.cherry_pick_calls();
        assert_eq!(picks.len(), 1, "expected one cherry-pick, got {picks:?}");
        let expected: Vec<String> = shas.iter().map(ToString::to_string).collect();
        assert_eq!(picks[0].0, expected);
    }

    fn record(&self, call: RepoCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository for MockRepo {
    fn in_progress_operation(&self) -> Result<Option<PathBuf>> {
        Ok(self.in_progress.lock().unwrap().clone())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.record(RepoCall::Checkout(reference.to_string()));
        Ok(())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record(RepoCall::CreateBranch(name.to_string()));
        Ok(())
    }

    fn cherry_pick(&self, shas: &[String], options: ReplayOptions) -> Result<()> {
        self.record(RepoCall::CherryPick {
            shas: shas.to_vec(),
            options,
        });
        if let Some(msg) = self.error_on_cherry_pick.lock().unwrap().as_ref() {
            return Err(Error::Git(msg.clone()));
        }
        Ok(())
    }

    fn has_conflicts(&self) -> Result<(bool, Vec<String>)> {
        if let Some(msg) = self.error_on_status.lock().unwrap().as_ref() {
            return Err(Error::Git(msg.clone()));
        }
        let files = self.conflict_files.lock().unwrap().clone();
        Ok((!files.is_empty(), files))
    }

    fn push(&self, branch: &str, remote: &str) -> Result<()> {
        self.record(RepoCall::Push {
            branch: branch.to_string(),
            remote: remote.to_string(),
        });
        if let Some(msg) = self.error_on_push.lock().unwrap().as_ref() {
            return Err(Error::Git(msg.clone()));
        }
        Ok(())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.record(RepoCall::AddRemote {
            name: name.to_string(),
            url: url.to_string(),
        });
        self.set_remote(name, url);
        Ok(())
    }

    fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.remotes.lock().unwrap().contains_key(name))
    }

    fn main_remote_url(&self) -> Result<String> {
        let remotes = self.remotes.lock().unwrap();
        ["upstream", "origin"]
            .iter()
            .find_map(|name| remotes.get(*name).cloned())
            .ok_or_else(|| Error::RemoteNotFound("upstream or origin".to_string()))
    }
}
