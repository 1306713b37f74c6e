//! Version control capability used by the promotion flows.
//!
//! Flows are written against [`GitOperations`] only. [`crate::git::SystemGit`]
//! drives the real `git` binary and [`crate::git::InMemoryGit`] models a commit
//! graph for tests.

use crate::error::Result;
use std::future::Future;

/// Version control primitives needed by the release, ship and hotfix flows
pub trait GitOperations {
    /// Name of the checked-out branch (`HEAD` when detached)
    fn current_branch(&self) -> impl Future<Output = Result<String>>;

    /// True iff no tracked or untracked changes are pending
    fn is_clean(&self) -> impl Future<Output = Result<bool>>;

    /// Update remote-tracking refs
    fn fetch(&self, remote: &str) -> impl Future<Output = Result<()>>;

    /// Switch to an existing branch, creating a tracking branch from the remote if needed
    fn checkout(&self, branch: &str) -> impl Future<Output = Result<()>>;

    /// Create a branch at `HEAD` and switch to it
    fn create_branch(&self, name: &str) -> impl Future<Output = Result<()>>;

    /// Integrate `remote/branch` into the current branch, refusing anything but a fast-forward
    fn pull_fast_forward_only(
        &self,
        remote: &str,
        branch: &str,
    ) -> impl Future<Output = Result<()>>;

    /// Fast-forward the current branch to `branch`. Already-merged is a no-op.
    fn merge_fast_forward_only(&self, branch: &str) -> impl Future<Output = Result<()>>;

    /// Merge `branch` with an explicit merge commit even when a fast-forward is possible
    fn merge_no_fast_forward(
        &self,
        branch: &str,
        message: &str,
    ) -> impl Future<Output = Result<()>>;

    /// Push a local branch to the remote
    fn push(&self, remote: &str, branch: &str) -> impl Future<Output = Result<()>>;

    /// Stage every change, tracked or not
    fn stage_all(&self) -> impl Future<Output = Result<()>>;

    /// Whether the index differs from `HEAD`
    fn has_staged_changes(&self) -> impl Future<Output = Result<bool>>;

    /// Commit the index with a subject and optional extended body
    fn commit(&self, message: &str, body: Option<&str>) -> impl Future<Output = Result<()>>;

    /// True if the branch exists locally or among remote-tracking refs.
    /// Remote accuracy depends on a prior fetch.
    fn branch_exists(&self, name: &str) -> impl Future<Output = Result<bool>>;

    /// Delete a fully merged local branch
    fn delete_branch_local(&self, name: &str) -> impl Future<Output = Result<()>>;

    /// Delete a branch on the remote
    fn delete_branch_remote(&self, remote: &str, name: &str) -> impl Future<Output = Result<()>>;

    /// Subjects of commits reachable from `to` but not from `from`, newest first
    fn log_subjects_between(
        &self,
        from: &str,
        to: &str,
    ) -> impl Future<Output = Result<Vec<String>>>;
}
