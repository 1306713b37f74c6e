//! In-memory commit graph implementing [`GitOperations`].
//!
//! Models local branch tips, remote branch tips, `HEAD`, a dirty flag and a
//! journal of every mutating call. File contents are not tracked, so commits
//! always succeed. Remote-tracking refs and the remote itself are the same map,
//! which makes `fetch` a no-op.

use crate::error::{GitError, Result};
use crate::git::GitOperations;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

/// Commit identifier within an [`InMemoryGit`] graph
pub type CommitId = usize;

#[derive(Debug, Clone)]
struct Commit {
    subject: String,
    body: Option<String>,
    parents: Vec<CommitId>,
}

#[derive(Debug)]
struct State {
    remote_name: String,
    commits: Vec<Commit>,
    local: BTreeMap<String, CommitId>,
    remote: BTreeMap<String, CommitId>,
    head: String,
    dirty: bool,
    staged: bool,
    journal: Vec<String>,
    failures: Vec<String>,
}

/// Fake repository for exercising flows without a real `git`
#[derive(Debug)]
pub struct InMemoryGit {
    state: Mutex<State>,
}

impl InMemoryGit {
    /// Repository with one root commit on `branch`, already pushed to `remote`
    pub fn new(remote: &str, branch: &str) -> Self {
        let mut local = BTreeMap::new();
        local.insert(branch.to_string(), 0);
        let remote_branches = local.clone();

        Self {
            state: Mutex::new(State {
                remote_name: remote.to_string(),
                commits: vec![Commit {
                    subject: "initial commit".to_string(),
                    body: None,
                    parents: Vec::new(),
                }],
                local,
                remote: remote_branches,
                head: branch.to_string(),
                dirty: false,
                staged: false,
                journal: Vec::new(),
                failures: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked mid-call
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ----- test setup helpers (not journaled) -----

    /// Add a commit on a local branch without checking it out
    pub fn commit_on(&self, branch: &str, subject: &str) -> CommitId {
        let mut state = self.lock();
        let parent = state.local.get(branch).copied();
        let id = state.add_commit(subject, None, parent.into_iter().collect());
        state.local.insert(branch.to_string(), id);
        id
    }

    /// Create a local branch pointing at another local branch's tip
    pub fn branch_from(&self, name: &str, from: &str) {
        let mut state = self.lock();
        if let Some(tip) = state.local.get(from).copied() {
            state.local.insert(name.to_string(), tip);
        }
    }

    /// Make the remote branch match the local one
    pub fn publish(&self, branch: &str) {
        let mut state = self.lock();
        if let Some(tip) = state.local.get(branch).copied() {
            state.remote.insert(branch.to_string(), tip);
        }
    }

    /// Drop a branch from the remote only
    pub fn unpublish(&self, branch: &str) {
        self.lock().remote.remove(branch);
    }

    /// Move `HEAD` without journaling
    pub fn set_head(&self, branch: &str) {
        self.lock().head = branch.to_string();
    }

    /// Simulate uncommitted changes in the working tree
    pub fn set_dirty(&self, dirty: bool) {
        self.lock().dirty = dirty;
    }

    /// Make every journaled operation starting with `prefix` fail
    pub fn fail_on(&self, prefix: &str) {
        self.lock().failures.push(prefix.to_string());
    }

    // ----- inspection -----

    /// Tip of a local branch
    pub fn tip(&self, branch: &str) -> Option<CommitId> {
        self.lock().local.get(branch).copied()
    }

    /// Tip of a remote branch
    pub fn remote_tip(&self, branch: &str) -> Option<CommitId> {
        self.lock().remote.get(branch).copied()
    }

    /// Currently checked-out branch
    pub fn head(&self) -> String {
        self.lock().head.clone()
    }

    /// Mutating operations performed through the trait, in order
    pub fn journal(&self) -> Vec<String> {
        self.lock().journal.clone()
    }

    /// Subject of a commit
    pub fn subject(&self, id: CommitId) -> Option<String> {
        self.lock().commits.get(id).map(|c| c.subject.clone())
    }

    /// Extended body of a commit
    pub fn body(&self, id: CommitId) -> Option<String> {
        self.lock().commits.get(id).and_then(|c| c.body.clone())
    }

    /// Parents of a commit
    pub fn parents(&self, id: CommitId) -> Vec<CommitId> {
        self.lock()
            .commits
            .get(id)
            .map(|c| c.parents.clone())
            .unwrap_or_default()
    }

    /// Whether `ancestor` is reachable from `descendant` (inclusive)
    pub fn contains(&self, descendant: CommitId, ancestor: CommitId) -> bool {
        self.lock().reachable(descendant).contains(&ancestor)
    }
}

impl State {
    fn add_commit(
        &mut self,
        subject: &str,
        body: Option<&str>,
        parents: Vec<CommitId>,
    ) -> CommitId {
        self.commits.push(Commit {
            subject: subject.to_string(),
            body: body.map(str::to_string),
            parents,
        });
        self.commits.len() - 1
    }

    fn record(&mut self, operation: String) -> Result<()> {
        if self.failures.iter().any(|prefix| operation.starts_with(prefix.as_str())) {
            return Err(GitError::CommandFailed {
                command: format!("git {operation}"),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        self.journal.push(operation);
        Ok(())
    }

    fn reachable(&self, tip: CommitId) -> BTreeSet<CommitId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![tip];
        while let Some(id) = stack.pop() {
            if seen.insert(id)
                && let Some(commit) = self.commits.get(id)
            {
                stack.extend(commit.parents.iter().copied());
            }
        }
        seen
    }

    fn is_ancestor(&self, ancestor: CommitId, descendant: CommitId) -> bool {
        self.reachable(descendant).contains(&ancestor)
    }

    fn head_tip(&self) -> Result<CommitId> {
        self.local.get(&self.head).copied().ok_or_else(|| {
            GitError::BranchNotFound {
                name: self.head.clone(),
            }
            .into()
        })
    }

    fn resolve(&self, name: &str) -> Result<CommitId> {
        if name == "HEAD" {
            return self.head_tip();
        }
        if let Some(tip) = self.local.get(name) {
            return Ok(*tip);
        }
        let remote_prefix = format!("{}/", self.remote_name);
        if let Some(tip) = name
            .strip_prefix(&remote_prefix)
            .and_then(|branch| self.remote.get(branch))
        {
            return Ok(*tip);
        }
        Err(GitError::BranchNotFound {
            name: name.to_string(),
        }
        .into())
    }

    fn fast_forward_head(&mut self, source: CommitId, source_name: &str) -> Result<()> {
        let current = self.head_tip()?;
        if self.is_ancestor(source, current) {
            return Ok(());
        }
        if !self.is_ancestor(current, source) {
            return Err(GitError::NotFastForward {
                branch: source_name.to_string(),
                into: self.head.clone(),
            }
            .into());
        }
        let head = self.head.clone();
        self.local.insert(head, source);
        Ok(())
    }
}

impl GitOperations for InMemoryGit {
    async fn current_branch(&self) -> Result<String> {
        Ok(self.head())
    }

    async fn is_clean(&self) -> Result<bool> {
        Ok(!self.lock().dirty)
    }

    async fn fetch(&self, remote: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("fetch {remote}"))?;
        if remote != state.remote_name {
            return Err(GitError::CommandFailed {
                command: format!("git fetch {remote}"),
                reason: format!("'{remote}' does not appear to be a git repository"),
            }
            .into());
        }
        Ok(())
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("checkout {branch}"))?;
        if !state.local.contains_key(branch) {
            let tip = state.remote.get(branch).copied().ok_or_else(|| GitError::BranchNotFound {
                name: branch.to_string(),
            })?;
            state.local.insert(branch.to_string(), tip);
        }
        state.head = branch.to_string();
        Ok(())
    }

    async fn create_branch(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("checkout -b {name}"))?;
        if state.local.contains_key(name) {
            return Err(GitError::CommandFailed {
                command: format!("git checkout -b {name}"),
                reason: format!("a branch named '{name}' already exists"),
            }
            .into());
        }
        let tip = state.head_tip()?;
        state.local.insert(name.to_string(), tip);
        state.head = name.to_string();
        Ok(())
    }

    async fn pull_fast_forward_only(&self, remote: &str, branch: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("pull --ff-only {remote} {branch}"))?;
        let source = state.remote.get(branch).copied().ok_or_else(|| GitError::CommandFailed {
            command: format!("git pull --ff-only {remote} {branch}"),
            reason: format!("couldn't find remote ref {branch}"),
        })?;
        state.fast_forward_head(source, &format!("{remote}/{branch}"))
    }

    async fn merge_fast_forward_only(&self, branch: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("merge --ff-only {branch}"))?;
        let source = state.resolve(branch)?;
        state.fast_forward_head(source, branch)
    }

    async fn merge_no_fast_forward(&self, branch: &str, message: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("merge --no-ff {branch}"))?;
        let source = state.resolve(branch)?;
        let current = state.head_tip()?;
        if state.is_ancestor(source, current) {
            return Ok(());
        }
        let merge = state.add_commit(message, None, vec![current, source]);
        let head = state.head.clone();
        state.local.insert(head, merge);
        Ok(())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("push {remote} {branch}"))?;
        let local = state.local.get(branch).copied().ok_or_else(|| GitError::CommandFailed {
            command: format!("git push {remote} {branch}"),
            reason: format!("src refspec {branch} does not match any"),
        })?;
        if let Some(existing) = state.remote.get(branch).copied()
            && !state.is_ancestor(existing, local)
        {
            return Err(GitError::CommandFailed {
                command: format!("git push {remote} {branch}"),
                reason: "rejected (non-fast-forward)".to_string(),
            }
            .into());
        }
        state.remote.insert(branch.to_string(), local);
        Ok(())
    }

    async fn stage_all(&self) -> Result<()> {
        let mut state = self.lock();
        state.record("add -A".to_string())?;
        state.staged = state.dirty;
        Ok(())
    }

    async fn has_staged_changes(&self) -> Result<bool> {
        Ok(self.lock().staged)
    }

    async fn commit(&self, message: &str, body: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("commit {message}"))?;
        let parent = state.head_tip()?;
        let id = state.add_commit(message, body, vec![parent]);
        let head = state.head.clone();
        state.local.insert(head, id);
        state.dirty = false;
        state.staged = false;
        Ok(())
    }

    async fn branch_exists(&self, name: &str) -> Result<bool> {
        let state = self.lock();
        Ok(state.local.contains_key(name) || state.remote.contains_key(name))
    }

    async fn delete_branch_local(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("branch -d {name}"))?;
        let command = format!("git branch -d {name}");
        if state.head == name {
            return Err(GitError::CommandFailed {
                command,
                reason: format!("cannot delete branch '{name}' checked out"),
            }
            .into());
        }
        let tip = state.local.get(name).copied().ok_or_else(|| GitError::BranchNotFound {
            name: name.to_string(),
        })?;
        if !state.is_ancestor(tip, state.head_tip()?) {
            return Err(GitError::CommandFailed {
                command,
                reason: format!("the branch '{name}' is not fully merged"),
            }
            .into());
        }
        state.local.remove(name);
        Ok(())
    }

    async fn delete_branch_remote(&self, remote: &str, name: &str) -> Result<()> {
        let mut state = self.lock();
        state.record(format!("push {remote} --delete {name}"))?;
        if state.remote.remove(name).is_none() {
            return Err(GitError::CommandFailed {
                command: format!("git push {remote} --delete {name}"),
                reason: "remote ref does not exist".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn log_subjects_between(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let state = self.lock();
        let excluded = state.reachable(state.resolve(from)?);
        let included = state.reachable(state.resolve(to)?);
        let mut ids: Vec<CommitId> = included.difference(&excluded).copied().collect();
        ids.reverse();
        Ok(ids.into_iter().map(|id| state.commits[id].subject.clone()).collect())
    }
}
