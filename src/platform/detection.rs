//! Repository detection from git remote URLs

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// scp-like syntax: `git@github.com:owner/repo.git`
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<user>[\w.+-]+@)?(?P<host>[^:/\s]+):(?P<path>[^/].*)$")
        .expect("scp-like remote regex is valid")
});

const GITHUB_HOST: &str = "github.com";

/// A remote URL split into the parts needed to rebuild it
enum RemoteUrl {
    Scp {
        user: Option<String>,
        host: String,
        path: String,
    },
    Standard(Url),
}

impl RemoteUrl {
    fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        if url.contains("://") {
            return Url::parse(url).ok().map(Self::Standard);
        }
        let caps = SCP_LIKE.captures(url)?;
        Some(Self::Scp {
            user: caps.name("user").map(|m| m.as_str().to_string()),
            host: caps["host"].to_string(),
            path: caps["path"].to_string(),
        })
    }

    fn host(&self) -> Option<&str> {
        match self {
            Self::Scp { host, .. } => Some(host),
            Self::Standard(url) => url.host_str(),
        }
    }

    fn path(&self) -> &str {
        match self {
            Self::Scp { path, .. } => path,
            Self::Standard(url) => url.path(),
        }
    }
}

/// Split `owner/repo(.git)` into its two segments
fn owner_and_repo(path: &str) -> Option<(String, String)> {
    let trimmed = path.trim_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let mut parts = trimmed.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

fn is_github_host(host: &str) -> bool {
    host == GITHUB_HOST || host.split('.').any(|label| label == "github")
}

/// Detect the GitHub repository a remote URL points at
///
/// Returns `None` for hosts that are not GitHub or GitHub Enterprise.
pub fn detect_repo(url: &str) -> Option<PlatformConfig> {
    let remote = RemoteUrl::parse(url)?;
    let host = remote.host()?.to_lowercase();
    if !is_github_host(&host) {
        return None;
    }
    let (owner, repo) = owner_and_repo(remote.path())?;
    Some(PlatformConfig {
        owner,
        repo,
        host: (host != GITHUB_HOST).then_some(host),
    })
}

/// Parse repository coordinates from a remote URL
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    detect_repo(url).ok_or(Error::NoSupportedRemotes)
}

/// Rewrite a remote URL so it points at `fork_owner`'s copy of the repository
///
/// Keeps the transport (SSH or HTTPS) of the original URL.
pub fn fork_remote_url(main_url: &str, fork_owner: &str) -> Result<String> {
    let remote = RemoteUrl::parse(main_url).ok_or(Error::NoSupportedRemotes)?;
    let (_, repo) = owner_and_repo(remote.path()).ok_or(Error::NoSupportedRemotes)?;

    match remote {
        RemoteUrl::Scp { user, host, .. } => Ok(format!(
            "{}{host}:{fork_owner}/{repo}.git",
            user.unwrap_or_default()
        )),
        RemoteUrl::Standard(mut url) => {
            url.set_path(&format!("/{fork_owner}/{repo}.git"));
            Ok(url.to_string())
        }
    }
}
