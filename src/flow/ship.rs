//! Ship flow: version `staging` and promote it to `production`.
//!
//! After a successful run `production`, `staging` and `main` all point at the
//! release commit and the operator is back on `main`.

use super::{FlowContext, FlowOutcome, ReleasedVersion};
use crate::changelog::{self, ChangelogEntry, truncate_subject};
use crate::error::{GuardError, Result};
use crate::gate::ScriptRunner;
use crate::git::GitOperations;
use crate::prompt::Prompter;
use crate::version::{PackageManifest, VersionBump, parse_version};

/// Commit message for the release commit
pub fn release_commit_message(tag: &str) -> String {
    format!("chore(release): {tag}")
}

/// Ship `staging` to `production` with a `bump` version increment.
///
/// Declining the confirmation prompt returns [`FlowOutcome::Declined`] before
/// any mutation. Any failure after confirmation returns the operator to the
/// development branch.
pub async fn run<G: GitOperations, S: ScriptRunner>(
    ctx: &FlowContext<'_, G, S>,
    bump: VersionBump,
    prompter: &mut dyn Prompter,
) -> Result<FlowOutcome> {
    let config = ctx.config();
    let branches = &config.branches;
    let remote = ctx.remote();
    let git = ctx.git();
    let output = ctx.output();

    output.section(&format!("Ship: {} → {}", branches.staging, branches.production))?;

    ctx.require_branch(&branches.development).await?;
    ctx.require_clean().await?;

    git.fetch(remote).await?;
    ctx.require_branch_exists(&branches.staging).await?;
    ctx.require_branch_exists(&branches.production).await?;

    let staging_ref = config.remote_ref(&branches.staging);
    let production_ref = config.remote_ref(&branches.production);
    let pending = git.log_subjects_between(&production_ref, &staging_ref).await?;
    if pending.is_empty() {
        return Err(GuardError::NothingToShip {
            staging: staging_ref,
            production: production_ref,
        }
        .into());
    }

    let package = PackageManifest::load(&ctx.manifest_path())?;
    let current = parse_version(package.version()?)?;
    output.info(&format!(
        "{} commit(s) pending on {}:",
        pending.len(),
        branches.staging
    ))?;
    for subject in &pending {
        output.indent(&format!("- {}", truncate_subject(subject)))?;
    }

    let question = format!(
        "Ship {} ({} bump, currently {}) to {}?",
        package.name()?,
        bump,
        current,
        branches.production
    );
    if !prompter.confirm(&question)? {
        output.info("Ship cancelled, nothing was changed")?;
        return Ok(FlowOutcome::Declined);
    }

    let released = match promote(ctx, bump).await {
        Ok(released) => released,
        Err(e) => {
            log::warn!("Ship failed, returning to {}", branches.development);
            if let Err(checkout) = git.checkout(&branches.development).await {
                log::warn!("Could not return to {}: {checkout}", branches.development);
            }
            return Err(e);
        }
    };

    log::info!("Shipped {}", released.tag());
    output.success(&format!("Shipped {}", released.tag()))?;
    Ok(FlowOutcome::Completed)
}

/// Everything after confirmation: gate, version, changelog, release commit and
/// the production, main, staging merge chain. Ends on the development branch.
async fn promote<G: GitOperations, S: ScriptRunner>(
    ctx: &FlowContext<'_, G, S>,
    bump: VersionBump,
) -> Result<ReleasedVersion> {
    let config = ctx.config();
    let branches = &config.branches;
    let remote = ctx.remote();
    let git = ctx.git();
    let output = ctx.output();

    ctx.sync_branch(&branches.staging).await?;
    ctx.run_quality_gate().await?;

    let production_ref = config.remote_ref(&branches.production);
    let subjects = git.log_subjects_between(&production_ref, "HEAD").await?;
    let summary = changelog::render_bullets(&subjects, bump.as_str());
    let released = ctx.bump_version(bump, &summary).await?;

    let entry =
        ChangelogEntry::from_subjects(&released.version, ctx.date(), &subjects, bump.as_str());
    changelog::insert(&ctx.changelog_path(), &entry.to_markdown())?;
    output.success(&format!(
        "Version {} written, {} updated",
        released.version,
        config.changelog.display()
    ))?;

    ctx.run_fix().await;
    ctx.commit_release(&release_commit_message(&released.tag()), &entry.body)
        .await?;

    output.section("Promote")?;
    ctx.sync_branch(&branches.production).await?;
    git.merge_fast_forward_only(&branches.staging).await?;
    git.push(remote, &branches.production).await?;

    ctx.sync_branch(&branches.development).await?;
    git.merge_fast_forward_only(&branches.production).await?;
    git.push(remote, &branches.development).await?;

    git.checkout(&branches.staging).await?;
    git.merge_fast_forward_only(&branches.development).await?;
    git.push(remote, &branches.staging).await?;

    git.checkout(&branches.development).await?;
    Ok(released)
}
