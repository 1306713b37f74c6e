//! Shared helpers for command execution.

use crate::cli::OutputManager;
use crate::config::FlowConfig;
use crate::error::Result;
use crate::flow::{FlowContext, FlowOutcome};
use crate::gate::PackageScripts;
use crate::git::{RepositoryContext, SystemGit, repository_root};

/// Real capabilities for one flow invocation
pub(super) struct Session {
    git: SystemGit,
    scripts: PackageScripts,
    config: FlowConfig,
    output: OutputManager,
}

impl Session {
    /// Open the repository containing the current directory
    pub(super) async fn open() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = repository_root(&cwd).await?;
        let config = FlowConfig::discover(&root)?;
        let output = OutputManager::new(false);

        let git = SystemGit::open(
            RepositoryContext::new(&root, config.remote.clone()),
            output.clone(),
        )
        .await?;
        let scripts = PackageScripts::new(&config.scripts.runner, &root, output.clone());

        Ok(Self {
            git,
            scripts,
            config,
            output,
        })
    }

    /// Flow context borrowing this session's capabilities
    pub(super) fn context(&self) -> FlowContext<'_, SystemGit, PackageScripts> {
        FlowContext::new(
            &self.git,
            &self.scripts,
            &self.config,
            &self.output,
            &self.git.context().work_dir,
        )
    }
}

/// Print a flow failure with recovery suggestions and return the exit code
pub(super) fn report(command: &str, result: Result<FlowOutcome>) -> i32 {
    match result {
        Ok(outcome) => super::outcome_code(outcome),
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false);
            output.error(&format!("{command} failed: {e}"));
            log::debug!("{command} failed: {e:?}");

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty()
                && let Err(io) = print_suggestions(&output, &suggestions)
            {
                log::debug!("Could not print recovery suggestions: {io}");
            }
            e.exit_code()
        }
    }
}

fn print_suggestions(output: &OutputManager, suggestions: &[String]) -> std::io::Result<()> {
    output.println("\n💡 Recovery suggestions:")?;
    for suggestion in suggestions {
        output.indent(&format!("• {suggestion}"))?;
    }
    Ok(())
}
