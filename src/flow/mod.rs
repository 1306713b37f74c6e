//! Promotion flows over the `main -> staging -> production` pipeline.
//!
//! Each flow is a linear state machine written against [`GitOperations`] and
//! [`ScriptRunner`] only. Guards run before any mutation. Every step is awaited
//! before the next one starts because later steps depend on the branch the
//! previous one left checked out.

pub mod hotfix;
pub mod release;
pub mod ship;

use crate::changeset::ChangesetRecord;
use crate::cli::OutputManager;
use crate::config::FlowConfig;
use crate::error::{GuardError, Result};
use crate::gate::{QualityGate, ScriptRunner};
use crate::git::GitOperations;
use crate::version::{self, PackageManifest, VersionBump, parse_version};
use std::future::Future;
use std::path::PathBuf;

/// How a flow ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Every step ran
    Completed,
    /// The operator declined at the confirmation prompt; nothing was changed
    Declined,
}

/// Package identity after a version bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedVersion {
    /// Package name from the manifest
    pub package: String,
    /// Version now written in the manifest
    pub version: String,
}

impl ReleasedVersion {
    /// `<package>@<version>`
    pub fn tag(&self) -> String {
        format!("{}@{}", self.package, self.version)
    }
}

/// Capabilities and settings shared by every flow
#[derive(Debug)]
pub struct FlowContext<'a, G, S> {
    git: &'a G,
    scripts: &'a S,
    config: &'a FlowConfig,
    output: &'a OutputManager,
    work_dir: PathBuf,
    date: String,
}

impl<'a, G: GitOperations, S: ScriptRunner> FlowContext<'a, G, S> {
    /// Context rooted at `work_dir`, dated today
    pub fn new(
        git: &'a G,
        scripts: &'a S,
        config: &'a FlowConfig,
        output: &'a OutputManager,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            git,
            scripts,
            config,
            output,
            work_dir: work_dir.into(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    /// Override the changelog date (`YYYY-MM-DD`)
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Date used for new changelog sections
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Git capability
    pub fn git(&self) -> &G {
        self.git
    }

    /// Active configuration
    pub fn config(&self) -> &FlowConfig {
        self.config
    }

    /// Console output
    pub fn output(&self) -> &OutputManager {
        self.output
    }

    /// Absolute manifest path
    pub fn manifest_path(&self) -> PathBuf {
        self.work_dir.join(&self.config.manifest)
    }

    /// Absolute changelog path
    pub fn changelog_path(&self) -> PathBuf {
        self.work_dir.join(&self.config.changelog)
    }

    /// Remote holding the pipeline branches
    pub fn remote(&self) -> &str {
        &self.config.remote
    }

    /// Fail unless `expected` is checked out
    pub async fn require_branch(&self, expected: &str) -> Result<()> {
        let actual = self.git.current_branch().await?;
        if actual != expected {
            return Err(GuardError::WrongBranch {
                expected: expected.to_string(),
                actual,
            }
            .into());
        }
        Ok(())
    }

    /// Fail if the working tree has uncommitted changes
    pub async fn require_clean(&self) -> Result<()> {
        if !self.git.is_clean().await? {
            return Err(GuardError::DirtyWorkingTree.into());
        }
        Ok(())
    }

    /// Fail unless `name` exists locally or as a remote-tracking ref
    pub async fn require_branch_exists(&self, name: &str) -> Result<()> {
        if !self.git.branch_exists(name).await? {
            return Err(GuardError::MissingBranch {
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Run the configured quality gate
    pub async fn run_quality_gate(&self) -> Result<()> {
        self.output.section("Quality gate")?;
        QualityGate::new(self.scripts, &self.config.scripts.quality)
            .run_all()
            .await?;
        self.output.success("Quality gate passed")?;
        Ok(())
    }

    /// Run the formatting fix script, if any; failure only warns
    pub async fn run_fix(&self) {
        if let Some(fix) = self.config.fix_script() {
            best_effort(self.output, "formatting fix", self.scripts.run_script(fix)).await;
        }
    }

    /// Stage everything and commit if anything was staged.
    ///
    /// Returns whether a commit was made.
    pub async fn commit_all(&self, message: &str, body: Option<&str>) -> Result<bool> {
        self.git.stage_all().await?;
        if !self.git.has_staged_changes().await? {
            log::info!("Nothing staged, skipping commit '{message}'");
            return Ok(false);
        }
        self.git.commit(message, body).await?;
        Ok(true)
    }

    /// Stage everything and commit unconditionally
    pub async fn commit_release(&self, message: &str, body: &str) -> Result<()> {
        self.git.stage_all().await?;
        self.git.commit(message, Some(body)).await
    }

    /// Bump the manifest version.
    ///
    /// With changesets enabled the bump is delegated to the external version
    /// script through a changeset record, and whatever version it writes wins.
    pub async fn bump_version(&self, bump: VersionBump, summary: &str) -> Result<ReleasedVersion> {
        let manifest_path = self.manifest_path();

        if !self.config.changesets.enabled {
            let (manifest, next) = version::bump_manifest(&manifest_path, bump)?;
            return Ok(ReleasedVersion {
                package: manifest.name()?.to_string(),
                version: next.to_string(),
            });
        }

        let manifest = PackageManifest::load(&manifest_path)?;
        let package = manifest.name()?.to_string();
        let expected = bump.apply(&parse_version(manifest.version()?)?).to_string();

        let record = ChangesetRecord::new(&package, bump, summary);
        record.write(&self.work_dir.join(&self.config.changesets.directory))?;
        self.scripts
            .run_script(&self.config.changesets.version_script)
            .await?;

        let reloaded = PackageManifest::load(&manifest_path)?;
        let actual = reloaded.version()?.to_string();
        parse_version(&actual)?;
        if actual != expected {
            log::warn!("Version script produced {actual}, expected {expected}");
            self.output.warn(&format!(
                "Version tool wrote {actual} (computed {expected}); using {actual}"
            ))?;
        }
        Ok(ReleasedVersion {
            package,
            version: actual,
        })
    }

    /// Check out `branch` and fast-forward it from the remote
    pub async fn sync_branch(&self, branch: &str) -> Result<()> {
        self.git.checkout(branch).await?;
        self.git.pull_fast_forward_only(self.remote(), branch).await
    }
}

/// Await a step whose failure is tolerated.
///
/// A failure is logged and shown as a warning, and `None` is returned. This is
/// the only place a flow swallows an error.
pub async fn best_effort<T, F>(output: &OutputManager, label: &str, step: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match step.await {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Skipping {label}: {e}");
            if let Err(io) = output.warn(&format!("{label} failed, continuing: {e}")) {
                log::debug!("Could not print warning for {label}: {io}");
            }
            None
        }
    }
}
