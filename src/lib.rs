//! pr-cherrypick - reproduce merged GitHub pull requests on other branches
//!
//! GitHub does not record whether a pull request was squashed, merged with
//! a merge commit, or rebased. This crate infers the merge mode from commit
//! content, resolves the exact commits to replay, cherry-picks them onto a
//! fresh feature branch and opens a new pull request.

pub mod auth;
pub mod cherry_pick;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod platform;
pub mod replay;
pub mod repo;
pub mod types;
