//! Configuration loading
//!
//! Settings come from `.cherrypick.toml` at the repository root, falling
//! back to `<config dir>/pr-cherrypick/config.toml`. Command-line flags are
//! layered on top with [`Config::with_overrides`]. The resolved value is
//! handed to the orchestrator by value and never mutated afterwards.

use crate::error::{Error, Result};
use crate::repo::ConflictPreference;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename looked up at the repository root
pub const REPO_CONFIG_FILE: &str = ".cherrypick.toml";

/// Directory under the user config dir
const USER_CONFIG_DIR: &str = "pr-cherrypick";

/// Filename within the user config dir
const USER_CONFIG_FILE: &str = "config.toml";

/// Remote used when nothing else is configured
pub const DEFAULT_REMOTE: &str = "origin";

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Cherry-pick behaviour
    pub cherry_pick: CherryPickSection,
    /// Repository coordinates overriding remote detection
    pub github: GitHubSection,
}

/// `[cherry_pick]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CherryPickSection {
    /// Remote to push the feature branch to
    pub remote: Option<String>,
    /// Push to this user's fork and open the PR from there
    pub fork_owner: Option<String>,
    /// Strategy option applied to every cherry-pick in a run
    pub conflict_preference: Option<ConflictPreference>,
}

/// `[github]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubSection {
    /// Repository owner
    pub owner: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--remote`
    pub remote: Option<String>,
    /// `--fork-owner`
    pub fork_owner: Option<String>,
    /// `--prefer`
    pub conflict_preference: Option<ConflictPreference>,
}

/// Immutable options for one cherry-pick run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryPickOptions {
    /// Remote the feature branch is pushed to (ignored when `fork_owner` is set)
    pub remote: String,
    /// Fork owner for fork-based PRs
    pub fork_owner: Option<String>,
    /// Strategy option applied uniformly to every cherry-pick
    pub conflict_preference: Option<ConflictPreference>,
}

impl Default for CherryPickOptions {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            fork_owner: None,
            conflict_preference: None,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration for the repository at `repo_root`
    ///
    /// Returns defaults when neither file exists.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let repo_file = repo_root.join(REPO_CONFIG_FILE);
        if repo_file.exists() {
            return Self::load_file(&repo_file);
        }

        if let Some(user_file) = user_config_path()
            && user_file.exists()
        {
            return Self::load_file(&user_file);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Resolve run options, letting command-line values win
    pub fn with_overrides(&self, overrides: Overrides) -> CherryPickOptions {
        CherryPickOptions {
            remote: overrides
                .remote
                .or_else(|| self.cherry_pick.remote.clone())
                .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            fork_owner: overrides
                .fork_owner
                .or_else(|| self.cherry_pick.fork_owner.clone()),
            conflict_preference: overrides
                .conflict_preference
                .or(self.cherry_pick.conflict_preference),
        }
    }
}

/// Path of the per-user configuration file, if a config dir exists
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
}
