//! Adapter between the GitOperations trait and the system `git` binary.
//!
//! Queries capture their output. Mutating commands echo their command line and
//! inherit stdout/stderr so the operator sees every step of a promotion.

use crate::cli::OutputManager;
use crate::error::{GitError, Result};
use crate::git::{GitOperations, RepositoryContext};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output, Stdio};
use tokio::process::Command;

/// Git operations backed by the `git` executable
#[derive(Debug, Clone)]
pub struct SystemGit {
    context: RepositoryContext,
    git: PathBuf,
    output: OutputManager,
}

impl SystemGit {
    /// Locate `git` and verify `context.work_dir` is inside a repository.
    ///
    /// The context's work dir is normalised to the repository root.
    pub async fn open(context: RepositoryContext, output: OutputManager) -> Result<Self> {
        let root = repository_root(&context.work_dir).await?;
        let git = which::which("git").map_err(|_| GitError::NotInstalled)?;
        log::debug!("Opened repository at {}", root.display());

        Ok(Self {
            context: RepositoryContext::new(root, context.remote),
            git,
            output,
        })
    }

    /// Repository context this adapter operates on
    pub fn context(&self) -> &RepositoryContext {
        &self.context
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.git);
        cmd.args(args)
            .current_dir(&self.context.work_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        cmd
    }

    /// Run with captured output; never fails on non-zero exit
    async fn raw(&self, args: &[&str]) -> Result<Output> {
        log::debug!("git {} (in {})", args.join(" "), self.context.work_dir.display());
        let output = self
            .command(args)
            .output()
            .await
            .map_err(|e| spawn_failure(args, &e))?;
        Ok(output)
    }

    /// Run a read-only command and return trimmed stdout
    async fn query(&self, args: &[&str]) -> Result<String> {
        let output = self.raw(args).await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: command_line(args),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a mutating command with the operator watching
    async fn visible(&self, args: &[&str]) -> Result<()> {
        let line = command_line(args);
        self.output.progress(&line)?;
        log::debug!("{line} (in {})", self.context.work_dir.display());

        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| spawn_failure(args, &e))?;

        check_status(&line, status)
    }

    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let output = self
            .raw(&["merge-base", "--is-ancestor", ancestor, descendant])
            .await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(GitError::CommandFailed {
                command: command_line(&["merge-base", "--is-ancestor", ancestor, descendant]),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }

    async fn ref_exists(&self, full_ref: &str) -> Result<bool> {
        let output = self.raw(&["rev-parse", "--verify", "--quiet", full_ref]).await?;
        Ok(output.status.success())
    }
}

impl GitOperations for SystemGit {
    async fn current_branch(&self) -> Result<String> {
        self.query(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn is_clean(&self) -> Result<bool> {
        let status = self.query(&["status", "--porcelain"]).await?;
        Ok(status.is_empty())
    }

    async fn fetch(&self, remote: &str) -> Result<()> {
        self.visible(&["fetch", remote]).await
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.visible(&["checkout", branch]).await
    }

    async fn create_branch(&self, name: &str) -> Result<()> {
        self.visible(&["checkout", "-b", name]).await
    }

    async fn pull_fast_forward_only(&self, remote: &str, branch: &str) -> Result<()> {
        self.visible(&["pull", "--ff-only", remote, branch]).await
    }

    async fn merge_fast_forward_only(&self, branch: &str) -> Result<()> {
        // Check linearity first so divergence surfaces as a typed consistency failure
        if !self.is_ancestor("HEAD", branch).await? && !self.is_ancestor(branch, "HEAD").await? {
            return Err(GitError::NotFastForward {
                branch: branch.to_string(),
                into: self.current_branch().await?,
            }
            .into());
        }
        self.visible(&["merge", "--ff-only", branch]).await
    }

    async fn merge_no_fast_forward(&self, branch: &str, message: &str) -> Result<()> {
        self.visible(&["merge", "--no-ff", "--no-edit", "-m", message, branch])
            .await
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.visible(&["push", remote, branch]).await
    }

    async fn stage_all(&self) -> Result<()> {
        self.visible(&["add", "-A"]).await
    }

    async fn has_staged_changes(&self) -> Result<bool> {
        let output = self.raw(&["diff", "--cached", "--quiet"]).await?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(GitError::CommandFailed {
                command: command_line(&["diff", "--cached", "--quiet"]),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }

    async fn commit(&self, message: &str, body: Option<&str>) -> Result<()> {
        let mut args = vec!["commit", "-m", message];
        if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
            args.extend(["-m", body]);
        }
        self.visible(&args).await
    }

    async fn branch_exists(&self, name: &str) -> Result<bool> {
        if self.ref_exists(&format!("refs/heads/{name}")).await? {
            return Ok(true);
        }
        self.ref_exists(&format!("refs/remotes/{}/{name}", self.context.remote))
            .await
    }

    async fn delete_branch_local(&self, name: &str) -> Result<()> {
        self.visible(&["branch", "-d", name]).await
    }

    async fn delete_branch_remote(&self, remote: &str, name: &str) -> Result<()> {
        self.visible(&["push", remote, "--delete", name]).await
    }

    async fn log_subjects_between(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let range = format!("{from}..{to}");
        let stdout = self.query(&["log", "--format=%s", &range]).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Top-level directory of the repository containing `dir`
pub async fn repository_root(dir: &Path) -> Result<PathBuf> {
    let git = which::which("git").map_err(|_| GitError::NotInstalled)?;
    let output = Command::new(git)
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| spawn_failure(&["rev-parse", "--show-toplevel"], &e))?;

    if !output.status.success() {
        return Err(GitError::NotRepository {
            path: dir.to_path_buf(),
        }
        .into());
    }
    Ok(PathBuf::from(String::from_utf8_lossy(&output.stdout).trim()))
}

fn command_line(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

fn spawn_failure(args: &[&str], error: &std::io::Error) -> crate::error::FlowError {
    GitError::CommandFailed {
        command: command_line(args),
        reason: format!("failed to start git: {error}"),
    }
    .into()
}

fn check_status(line: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(GitError::CommandFailed {
        command: line.to_string(),
        reason: match status.code() {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        },
    }
    .into())
}
