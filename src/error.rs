//! Error types for promotion flow operations.
//!
//! Every fatal condition surfaces as a [`FlowError`] carrying an operator-facing
//! message and recovery suggestions. The binaries map all of them to exit code 1.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for promotion flow operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Main error type for all promotion flow operations
#[derive(Error, Debug)]
pub enum FlowError {
    /// Version arithmetic errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Package manifest errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Precondition failures detected before any mutation
    #[error("{0}")]
    Guard(#[from] GuardError),

    /// Build/typecheck/test failures
    #[error("Quality gate error: {0}")]
    Gate(#[from] GateError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Version arithmetic errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    /// Version is not exactly three non-negative integer components
    #[error("Invalid version format '{version}': expected MAJOR.MINOR.PATCH")]
    InvalidVersionFormat {
        /// Offending version string
        version: String,
    },
}

/// Package manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("Manifest not found at {path}")]
    NotFound {
        /// Expected manifest path
        path: PathBuf,
    },

    /// Manifest root is not a JSON object
    #[error("Manifest at {path} is not a JSON object")]
    NotAnObject {
        /// Manifest path
        path: PathBuf,
    },

    /// A required string field is missing or not a string
    #[error("Manifest at {path} is missing string field '{field}'")]
    MissingField {
        /// Manifest path
        path: PathBuf,
        /// Field name
        field: String,
    },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// git binary not found on PATH
    #[error("git executable not found on PATH")]
    NotInstalled,

    /// Working directory is not inside a git repository
    #[error("Not a git repository: {path}")]
    NotRepository {
        /// Directory that was checked
        path: PathBuf,
    },

    /// A git command exited non-zero
    #[error("'{command}' failed: {reason}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// stderr or exit status
        reason: String,
    },

    /// A merge that must be a fast-forward was not
    #[error("Cannot fast-forward '{into}' to '{branch}': histories have diverged")]
    NotFastForward {
        /// Branch being merged
        branch: String,
        /// Branch receiving the merge
        into: String,
    },

    /// Referenced branch does not exist locally or on the remote
    #[error("Branch '{name}' not found")]
    BranchNotFound {
        /// Branch name
        name: String,
    },
}

/// Precondition failures. Raised before any risky mutation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuardError {
    /// Flow started on the wrong branch
    #[error("Must be on '{expected}' (currently on '{actual}')")]
    WrongBranch {
        /// Required branch
        expected: String,
        /// Current branch
        actual: String,
    },

    /// Hotfix finish started outside a hotfix branch
    #[error("Must be on a '{prefix}*' branch (currently on '{actual}')")]
    NotHotfixBranch {
        /// Hotfix branch prefix
        prefix: String,
        /// Current branch
        actual: String,
    },

    /// Uncommitted changes present
    #[error("Working tree has uncommitted changes")]
    DirtyWorkingTree,

    /// A pipeline branch is missing locally and on the remote
    #[error("Branch '{name}' does not exist locally or on the remote")]
    MissingBranch {
        /// Branch name
        name: String,
    },

    /// Staging has no commits that production lacks
    #[error("Nothing to ship: '{staging}' has no commits ahead of '{production}'")]
    NothingToShip {
        /// Staging ref that was compared
        staging: String,
        /// Production ref that was compared
        production: String,
    },
}

/// Quality gate errors
#[derive(Error, Debug)]
pub enum GateError {
    /// A step exited non-zero
    #[error("Step '{step}' failed with {}", exit_label(.code))]
    QualityGateFailure {
        /// Script name
        step: String,
        /// Exit code (None when killed by a signal)
        code: Option<i32>,
    },

    /// The script runner could not be started
    #[error("Failed to start '{script}': {reason}")]
    ScriptSpawnFailed {
        /// Script name
        script: String,
        /// Spawn error
        reason: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        /// Config path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("Failed to parse {path}: {source}")]
    Invalid {
        /// Config path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },
}

impl FlowError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            FlowError::Guard(GuardError::DirtyWorkingTree) => vec![
                "Commit pending changes: git add -A && git commit -m 'message'".to_string(),
                "Stash changes temporarily: git stash".to_string(),
            ],
            FlowError::Guard(GuardError::WrongBranch { expected, .. }) => {
                vec![format!("Switch branches first: git checkout {expected}")]
            }
            FlowError::Guard(GuardError::NotHotfixBranch { prefix, .. }) => vec![
                format!("Check out the hotfix branch: git checkout {prefix}<name>"),
                "Start a new one with: flow-hotfix start <name>".to_string(),
            ],
            FlowError::Guard(GuardError::MissingBranch { name }) => vec![format!(
                "Create the branch and publish it: git checkout -b {name} && git push -u origin {name}"
            )],
            FlowError::Guard(GuardError::NothingToShip { .. }) => vec![
                "Promote main to staging first: flow-release".to_string(),
            ],
            FlowError::Gate(GateError::QualityGateFailure { step, .. }) => vec![
                format!("Fix the '{step}' failure and re-run the flow from the beginning"),
            ],
            FlowError::Git(GitError::NotFastForward { branch, into }) => vec![
                format!("Inspect divergence: git log --oneline {into}...{branch}"),
                format!("Reconcile '{into}' manually before re-running"),
            ],
            FlowError::Git(GitError::NotInstalled) => {
                vec!["Install git and make sure it is on PATH".to_string()]
            }
            FlowError::Version(VersionError::InvalidVersionFormat { .. }) => vec![
                "Set \"version\" in the manifest to MAJOR.MINOR.PATCH (e.g. \"1.0.0\")".to_string(),
            ],
            _ => Vec::new(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}
