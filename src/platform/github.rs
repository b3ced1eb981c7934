//! GitHub repository gateway

use crate::error::{Error, Result};
use crate::platform::RepositoryGateway;
use crate::types::{
    ChangedFile, Commit, NewPullRequest, PlatformConfig, PullRequestDetails, PullRequestRef,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

/// Page size for list endpoints (GitHub maximum)
const PER_PAGE: usize = 100;

/// GitHub returns at most this many files on a single commit
const MAX_COMMIT_FILES: usize = 300;

/// GitHub lists at most this many commits on a pull request
const MAX_PR_COMMITS: usize = 250;

/// Warn when a listing hit a GitHub cap and may be incomplete
fn warn_if_truncated(what: &str, count: usize, limit: usize) -> bool {
    if count < limit {
        return false;
    }
    warn!(
        what,
        count, limit, "GitHub listing reached its cap and may be truncated"
    );
    true
}

// REST response types for the commit endpoints. octocrab's commit models
// drop the per-file blob SHAs we fingerprint, so these are fetched raw.

#[derive(Deserialize)]
struct RestCommit {
    sha: String,
    commit: RestCommitDetail,
    #[serde(default)]
    parents: Vec<RestParent>,
    #[serde(default)]
    files: Vec<RestFile>,
}

#[derive(Deserialize)]
struct RestCommitDetail {
    tree: Option<RestTree>,
}

#[derive(Deserialize)]
struct RestTree {
    sha: String,
}

#[derive(Deserialize)]
struct RestParent {
    sha: String,
}

#[derive(Deserialize)]
struct RestFile {
    filename: String,
    /// Absent for some removed files
    sha: Option<String>,
}

#[derive(Deserialize)]
struct RestCommitRef {
    sha: String,
}

impl From<RestCommit> for Commit {
    fn from(c: RestCommit) -> Self {
        Self {
            sha: c.sha,
            tree_sha: c.commit.tree.map(|t| t.sha),
            parents: c.parents.into_iter().map(|p| p.sha).collect(),
            files: c
                .files
                .into_iter()
                .map(|f| ChangedFile {
                    path: f.filename,
                    blob_sha: f.sha.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// GitHub gateway using octocrab for pull requests and raw REST for commits
pub struct GitHubGateway {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubGateway {
    /// Create a gateway for github.com or the GitHub Enterprise host in `config`
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let api_base = config.host.as_ref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, config, &api_base)
    }

    /// Create a gateway talking to an explicit API base URL
    pub fn with_api_base(token: &str, config: PlatformConfig, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("pr-cherrypick")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{path}",
            self.api_base, self.config.owner, self.config.repo
        )
    }

    /// GET a JSON document, mapping 404 to `NotFound(what)`
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch {what}: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(Error::NotFound(what.to_string())),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::GitHubApi(format!(
                    "Fetching {what} returned {status}: {body}"
                )));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {what}: {e}")))
    }
}

#[async_trait]
impl RepositoryGateway for GitHubGateway {
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        debug!(number, "getting pull request");

        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(number)
            .await
            .map_err(|e| match Error::from(e) {
                Error::NotFound(_) => Error::NotFound(format!("pull request #{number}")),
                other => other,
            })?;

        let details = PullRequestDetails {
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            author: pr.user.as_ref().map(|u| u.login.clone()).unwrap_or_default(),
            base_ref: pr.base.ref_field.clone(),
            head_ref: pr.head.ref_field.clone(),
            merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
            merge_commit_sha: pr.merge_commit_sha.clone().filter(|s| !s.is_empty()),
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };

        debug!(number, merged = details.merged, "got pull request");
        Ok(details)
    }

    async fn get_commit(&self, sha: &str) -> Result<Commit> {
        debug!(sha, "getting commit");
        let url = self.repo_url(&format!("commits/{sha}"));
        let commit: RestCommit = self.get_json(&url, &format!("commit {sha}")).await?;
        let commit = Commit::from(commit);
        // Blob fingerprints of a truncated file list cannot be trusted
        warn_if_truncated(
            &format!("files of commit {sha}"),
            commit.files.len(),
            MAX_COMMIT_FILES,
        );
        debug!(
            sha,
            parents = commit.parents.len(),
            files = commit.files.len(),
            "got commit"
        );
        Ok(commit)
    }

    async fn list_pr_commits(&self, number: u64) -> Result<Vec<Commit>> {
        debug!(number, "listing PR commits");

        let mut refs: Vec<RestCommitRef> = Vec::new();
        for page in 1.. {
            let url = self.repo_url(&format!(
                "pulls/{number}/commits?per_page={PER_PAGE}&page={page}"
            ));
            let batch: Vec<RestCommitRef> = self
                .get_json(&url, &format!("commits of pull request #{number}"))
                .await?;
            let done = batch.len() < PER_PAGE;
            refs.extend(batch);
            if done {
                break;
            }
        }

        warn_if_truncated(
            &format!("commits of pull request #{number}"),
            refs.len(),
            MAX_PR_COMMITS,
        );

        // The list endpoint omits changed files, so each commit is fetched
        let mut commits = Vec::with_capacity(refs.len());
        for r in refs {
            commits.push(self.get_commit(&r.sha).await?);
        }

        debug!(number, count = commits.len(), "listed PR commits");
        Ok(commits)
    }

    async fn create_pull_request(&self, new_pr: &NewPullRequest) -> Result<PullRequestRef> {
        debug!(head = %new_pr.head, base = %new_pr.base, "creating PR");

        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(&new_pr.title, &new_pr.head, &new_pr.base)
            .body(&new_pr.body)
            .maintainer_can_modify(new_pr.maintainer_can_modify)
            .send()
            .await?;

        let result = PullRequestRef {
            number: pr.number,
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            head_ref: new_pr.head.clone(),
            base_ref: pr.base.ref_field.clone(),
        };
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
