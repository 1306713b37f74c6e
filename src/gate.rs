//! Quality gate: an ordered list of named scripts that must all succeed.
//!
//! Scripts run through a [`ScriptRunner`], which inherits the terminal so the
//! operator sees build and test output live. The first failing step stops the
//! gate; nothing is retried.

use crate::cli::OutputManager;
use crate::error::{GateError, Result};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Run a named package script, failing on non-zero exit
pub trait ScriptRunner {
    /// Run `script` to completion
    fn run_script(&self, script: &str) -> impl Future<Output = Result<()>>;
}

/// Runs scripts as `<runner> run <script>` in the repository root
#[derive(Debug, Clone)]
pub struct PackageScripts {
    runner: String,
    work_dir: PathBuf,
    output: OutputManager,
}

impl PackageScripts {
    /// Create a runner, e.g. `npm` or `pnpm`
    pub fn new(
        runner: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        output: OutputManager,
    ) -> Self {
        Self {
            runner: runner.into(),
            work_dir: work_dir.into(),
            output,
        }
    }
}

impl ScriptRunner for PackageScripts {
    async fn run_script(&self, script: &str) -> Result<()> {
        let program = which::which(&self.runner).map_err(|e| GateError::ScriptSpawnFailed {
            script: script.to_string(),
            reason: format!("'{}' not found on PATH: {e}", self.runner),
        })?;

        let line = format!("{} run {script}", self.runner);
        self.output.progress(&line)?;
        log::debug!("{line} (in {})", self.work_dir.display());

        let status = Command::new(program)
            .args(["run", script])
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| GateError::ScriptSpawnFailed {
                script: script.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(GateError::QualityGateFailure {
                step: script.to_string(),
                code: status.code(),
            }
            .into());
        }
        Ok(())
    }
}

/// Ordered build/typecheck/test steps
#[derive(Debug)]
pub struct QualityGate<'a, S> {
    runner: &'a S,
    steps: &'a [String],
}

impl<'a, S: ScriptRunner> QualityGate<'a, S> {
    /// Gate over `steps`, run by `runner`
    pub fn new(runner: &'a S, steps: &'a [String]) -> Self {
        Self { runner, steps }
    }

    /// Run every step in order; the first failure aborts the rest
    pub async fn run_all(&self) -> Result<()> {
        for step in self.steps {
            log::info!("Quality gate: {step}");
            self.runner.run_script(step).await?;
        }
        Ok(())
    }
}
