//! Shared command context
//!
//! Opens the working tree, loads configuration, detects the repository
//! and builds the GitHub gateway.

use pr_cherrypick::auth::get_github_auth;
use pr_cherrypick::config::{CherryPickOptions, Config, Overrides};
use pr_cherrypick::error::{Error, Result, ResultExt};
use pr_cherrypick::platform::{GitHubGateway, parse_repo_info};
use pr_cherrypick::repo::{GitRepository, LocalRepository};
use pr_cherrypick::types::PlatformConfig;
use std::path::Path;
use tracing::debug;

/// Everything a cherry-pick run needs, resolved once
pub struct CommandContext {
    /// The local working tree
    pub repo: GitRepository,
    /// GitHub gateway bound to the detected repository
    pub gateway: GitHubGateway,
    /// Resolved run options
    pub options: CherryPickOptions,
}

impl CommandContext {
    /// Build the context for the repository containing `path`
    pub fn new(path: &Path, overrides: Overrides) -> Result<Self> {
        let repo = GitRepository::open(path)?;
        let config = Config::load(repo.workdir())?;

        let platform_config = resolve_platform(&config, &repo)?;
        debug!(
            owner = %platform_config.owner,
            repo = %platform_config.repo,
            "detected repository"
        );

        let auth = get_github_auth(platform_config.host.as_deref())?;
        let gateway = GitHubGateway::new(&auth.token, platform_config)?;
        let options = config.with_overrides(overrides);

        Ok(Self {
            repo,
            gateway,
            options,
        })
    }
}

/// Repository coordinates from config, falling back to the main remote
fn resolve_platform(config: &Config, repo: &GitRepository) -> Result<PlatformConfig> {
    if let (Some(owner), Some(name)) = (&config.github.owner, &config.github.repo) {
        return Ok(PlatformConfig {
            owner: owner.clone(),
            repo: name.clone(),
            host: config.github.host.clone(),
        });
    }

    let url = repo
        .main_remote_url()
        .context("reading main remote URL")?;
    let mut detected = parse_repo_info(&url).map_err(|e| match e {
        Error::NoSupportedRemotes => Error::Platform(format!(
            "remote URL {url} is not a GitHub repository; set [github] owner and repo"
        )),
        other => other,
    })?;
    if config.github.host.is_some() {
        detected.host.clone_from(&config.github.host);
    }
    Ok(detected)
}
