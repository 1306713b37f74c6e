//! Flow configuration.
//!
//! Defaults match the conventional `main -> staging -> production` layout and an
//! npm-style script runner. An optional `flow.toml` at the repository root
//! overrides them, and a couple of environment variables override the file.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional configuration file at the repository root
pub const CONFIG_FILE_NAME: &str = "flow.toml";

/// Complete configuration for the promotion flows
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FlowConfig {
    /// Remote that holds the pipeline branches
    pub remote: String,
    /// Pipeline branch names
    pub branches: BranchConfig,
    /// Manifest path relative to the repository root
    pub manifest: PathBuf,
    /// Changelog path relative to the repository root
    pub changelog: PathBuf,
    /// Script runner and quality gate steps
    pub scripts: ScriptConfig,
    /// External changeset-based versioning
    pub changesets: ChangesetConfig,
}

/// Names of the promotion pipeline branches
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BranchConfig {
    /// Development trunk
    pub development: String,
    /// Validated, pre-release branch
    pub staging: String,
    /// Released branch
    pub production: String,
    /// Prefix for emergency branches cut from production
    pub hotfix_prefix: String,
}

/// How named scripts are run
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    /// Program invoked as `<runner> run <script>`
    pub runner: String,
    /// Ordered quality gate scripts
    pub quality: Vec<String>,
    /// Best-effort formatting fix script; empty disables it
    pub fix: String,
}

/// Changeset record settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ChangesetConfig {
    /// Delegate version computation to an external changeset tool
    pub enabled: bool,
    /// Directory records are written to
    pub directory: PathBuf,
    /// Script that consumes records and rewrites the manifest
    pub version_script: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branches: BranchConfig::default(),
            manifest: PathBuf::from("package.json"),
            changelog: PathBuf::from("CHANGELOG.md"),
            scripts: ScriptConfig::default(),
            changesets: ChangesetConfig::default(),
        }
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            development: "main".to_string(),
            staging: "staging".to_string(),
            production: "production".to_string(),
            hotfix_prefix: "hotfix/".to_string(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            runner: "npm".to_string(),
            quality: vec!["build".to_string(), "typecheck".to_string(), "test".to_string()],
            fix: "fix".to_string(),
        }
    }
}

impl Default for ChangesetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from(".changeset"),
            version_script: "changeset:version".to_string(),
        }
    }
}

impl FlowConfig {
    /// Load `flow.toml` from `root` if present, then apply environment overrides
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let config = if path.exists() {
            Self::load(&path)?
        } else {
            log::debug!("No {} found in {}, using defaults", CONFIG_FILE_NAME, root.display());
            Self::default()
        };
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `FLOW_REMOTE` and `FLOW_SCRIPT_RUNNER`; empty values are ignored
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(remote) = non_empty("FLOW_REMOTE") {
            self.remote = remote;
        }
        if let Some(runner) = non_empty("FLOW_SCRIPT_RUNNER") {
            self.scripts.runner = runner;
        }
        self
    }

    /// Fix script, if one is configured
    pub fn fix_script(&self) -> Option<&str> {
        let fix = self.scripts.fix.trim();
        (!fix.is_empty()).then_some(fix)
    }

    /// `<remote>/<branch>` remote-tracking ref name
    pub fn remote_ref(&self, branch: &str) -> String {
        format!("{}/{}", self.remote, branch)
    }
}
