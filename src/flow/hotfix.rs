//! Hotfix flow: branch from `production`, then merge the fix down the pipeline.
//!
//! `start` and `finish` are separate invocations and share no runtime state.
//! Finishing records every integration with an explicit merge commit.

use super::{FlowContext, FlowOutcome, best_effort};
use crate::changelog::{self, ChangelogEntry};
use crate::error::{CliError, GuardError, Result};
use crate::gate::ScriptRunner;
use crate::git::GitOperations;
use crate::version::VersionBump;

/// Commit message for the hotfix version commit
pub fn hotfix_commit_message(tag: &str) -> String {
    format!("chore(hotfix): {tag}")
}

/// Merge commit message for integrating `source` into `target`
pub fn merge_message(source: &str, target: &str) -> String {
    format!("chore(hotfix): merge {source} into {target}")
}

/// Cut `<prefix><name>` from an up-to-date `production`
pub async fn start<G: GitOperations, S: ScriptRunner>(
    ctx: &FlowContext<'_, G, S>,
    name: &str,
) -> Result<FlowOutcome> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::MissingArgument {
            argument: "name".to_string(),
        }
        .into());
    }

    let branches = &ctx.config().branches;
    let branch = format!("{}{name}", branches.hotfix_prefix);
    let git = ctx.git();

    ctx.output().section(&format!("Hotfix start: {branch}"))?;
    ctx.require_clean().await?;

    git.fetch(ctx.remote()).await?;
    ctx.require_branch_exists(&branches.production).await?;

    ctx.sync_branch(&branches.production).await?;
    git.create_branch(&branch).await?;

    log::info!("Created {branch} from {}", branches.production);
    ctx.output().success(&format!(
        "On {branch}; commit the fix, then run: flow-hotfix finish <patch|minor> <message>"
    ))?;
    Ok(FlowOutcome::Completed)
}

/// Version, changelog and merge the current hotfix branch into every
/// pipeline branch, then delete it.
pub async fn finish<G: GitOperations, S: ScriptRunner>(
    ctx: &FlowContext<'_, G, S>,
    bump: VersionBump,
    message: &str,
) -> Result<FlowOutcome> {
    if bump == VersionBump::Major {
        return Err(CliError::InvalidArguments {
            reason: "hotfixes may only bump patch or minor".to_string(),
        }
        .into());
    }
    let message = message.trim();
    if message.is_empty() {
        return Err(CliError::MissingArgument {
            argument: "message".to_string(),
        }
        .into());
    }

    let branches = &ctx.config().branches;
    let remote = ctx.remote();
    let git = ctx.git();
    let output = ctx.output();

    let branch = git.current_branch().await?;
    if !branch.starts_with(&branches.hotfix_prefix) {
        return Err(GuardError::NotHotfixBranch {
            prefix: branches.hotfix_prefix.clone(),
            actual: branch,
        }
        .into());
    }
    ctx.require_clean().await?;
    output.section(&format!("Hotfix finish: {branch}"))?;

    ctx.run_quality_gate().await?;

    let released = ctx.bump_version(bump, message).await?;
    let entry = ChangelogEntry::hotfix(&released.version, ctx.date(), message);
    changelog::insert(&ctx.changelog_path(), &entry.to_markdown())?;

    ctx.run_fix().await;
    ctx.commit_release(&hotfix_commit_message(&released.tag()), message)
        .await?;

    output.section("Merge down the pipeline")?;
    git.fetch(remote).await?;
    let chain = [
        (branch.as_str(), branches.production.as_str()),
        (branches.production.as_str(), branches.staging.as_str()),
        (branches.staging.as_str(), branches.development.as_str()),
    ];
    for (source, target) in chain {
        ctx.sync_branch(target).await?;
        git.merge_no_fast_forward(source, &merge_message(source, target))
            .await?;
        git.push(remote, target).await?;
    }

    git.delete_branch_local(&branch).await?;
    best_effort(
        output,
        &format!("deleting {branch} on {remote}"),
        git.delete_branch_remote(remote, &branch),
    )
    .await;

    log::info!("Hotfix {} merged into all pipeline branches", released.tag());
    output.success(&format!("Hotfix {} released", released.tag()))?;
    Ok(FlowOutcome::Completed)
}
