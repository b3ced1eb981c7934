//! Branch names and PR text

use crate::types::PullRequest;

/// Prefix of every feature branch
pub const BRANCH_PREFIX: &str = "automated-cherry-pick-of-";

/// Name of the feature branch for `pr_number`, unique per second
pub fn feature_branch_name(pr_number: u64, unix_timestamp: i64) -> String {
    format!("{BRANCH_PREFIX}{pr_number}-{unix_timestamp}")
}

/// Title of the cherry-pick PR
pub fn pr_title(pr_number: u64, target_branch: &str) -> String {
    format!("Automated cherry pick of #{pr_number} on {target_branch}")
}

/// Body of the cherry-pick PR
///
/// Links the original PR when its URL is known.
pub fn pr_body(pr: &PullRequest, target_branch: &str) -> String {
    let number = pr.number;
    let mut body = format!("Automated cherry pick of #{number} on {target_branch}\n\n");
    if pr.title.is_empty() {
        body.push_str(&format!("Cherry pick of #{number} on {target_branch}.\n\n"));
    } else {
        body.push_str(&format!(
            "Cherry pick of #{number} on {target_branch}: {}\n\n",
            pr.title
        ));
    }
    if !pr.html_url.is_empty() {
        body.push_str(&format!("Original pull request: {}\n\n", pr.html_url));
    }
    body.push_str(&format!(
        "/cc @{}\n\n```release-note\nNONE\n```\n",
        pr.username
    ));
    body
}
