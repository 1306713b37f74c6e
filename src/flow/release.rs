//! Release flow: promote `main` to `staging`.
//!
//! No version is assigned here; versions are reserved for the ship flow.

use super::{FlowContext, FlowOutcome};
use crate::error::Result;
use crate::gate::ScriptRunner;
use crate::git::GitOperations;

/// Commit message used when the operator gives none
pub const DEFAULT_MESSAGE: &str = "auto-fix formatting";

/// Commit message for changes produced by the fix step
pub fn staging_commit_message(message: Option<&str>) -> String {
    let message = message.map(str::trim).filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MESSAGE);
    format!("chore(staging): {message}")
}

/// Validate `main` and fast-forward `staging` to it.
///
/// Re-running with nothing new on `main` is a no-op merge and push.
pub async fn run<G: GitOperations, S: ScriptRunner>(
    ctx: &FlowContext<'_, G, S>,
    message: Option<&str>,
) -> Result<FlowOutcome> {
    let branches = &ctx.config().branches;
    let remote = ctx.remote();
    let git = ctx.git();

    ctx.output()
        .section(&format!("Release: {} → {}", branches.development, branches.staging))?;

    ctx.require_branch(&branches.development).await?;
    ctx.require_clean().await?;

    git.fetch(remote).await?;
    git.pull_fast_forward_only(remote, &branches.development).await?;
    ctx.require_branch_exists(&branches.staging).await?;

    ctx.run_quality_gate().await?;
    ctx.run_fix().await;

    if ctx.commit_all(&staging_commit_message(message), None).await? {
        ctx.output().info("Committed fix-up changes")?;
    }

    ctx.output().section(&format!("Promote to {}", branches.staging))?;
    git.checkout(&branches.staging).await?;
    git.merge_fast_forward_only(&branches.development).await?;
    git.push(remote, &branches.staging).await?;

    git.checkout(&branches.development).await?;
    git.push(remote, &branches.development).await?;

    log::info!("Promoted {} to {}", branches.development, branches.staging);
    ctx.output().success(&format!(
        "{} now matches {}",
        branches.staging, branches.development
    ))?;
    Ok(FlowOutcome::Completed)
}
