//! Content fingerprints for comparing commits across SHAs
//!
//! Rebasing or squashing on the platform rewrites commit SHAs but keeps
//! the blobs a commit introduces. Hashing the set of changed blob SHAs
//! gives a value that survives the rewrite, so PR commits can be matched
//! against their counterparts on the base branch.

use crate::types::ChangedFile;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const SEPARATOR: &str = ":";

/// Order-independent hash of a commit's changed files
///
/// The empty fingerprint means "no changes recorded" and never equals a
/// real digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The sentinel for a commit with no recorded changes
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the no-changes sentinel
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex digest (empty for the sentinel)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "(empty)")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Fingerprint a set of changed files
///
/// Blob SHAs are sorted before hashing, so iteration order never matters.
pub fn fingerprint(files: &[ChangedFile]) -> Fingerprint {
    if files.is_empty() {
        return Fingerprint::empty();
    }

    let mut hashes: Vec<&str> = files.iter().map(|f| f.blob_sha.as_str()).collect();
    hashes.sort_unstable();

    let digest = Sha256::digest(hashes.join(SEPARATOR).as_bytes());
    Fingerprint(hex::encode(digest))
}
