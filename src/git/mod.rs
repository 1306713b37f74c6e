//! Git operations for the promotion pipeline.
//!
//! This module defines the [`GitOperations`] capability, a real adapter over the
//! system `git` binary and an in-memory commit-graph model used by tests.

mod git_adapter;
mod memory;
mod operations;

pub use git_adapter::{SystemGit, repository_root};
pub use memory::InMemoryGit;
pub use operations::GitOperations;

use std::path::PathBuf;

/// Explicit repository context passed to adapters instead of ambient process state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    /// Repository working directory
    pub work_dir: PathBuf,
    /// Remote holding the pipeline branches
    pub remote: String,
}

impl RepositoryContext {
    /// Create a context for `work_dir` and `remote`
    pub fn new(work_dir: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            remote: remote.into(),
        }
    }
}
