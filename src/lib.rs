//! # Promotion Flow
//!
//! Release automation for a three-branch promotion pipeline:
//! `main` (development) → `staging` (validated) → `production` (released).
//!
//! ## Flows
//!
//! - **Release** (`flow-release`): run the quality gate on `main` and
//!   fast-forward `staging` to it.
//! - **Ship** (`flow-ship`): bump the package version, write a changelog
//!   section from the pending commits and promote `staging` to `production`,
//!   carrying the release commit back to `main` and `staging`.
//! - **Hotfix** (`flow-hotfix start|finish`): branch from `production`, then
//!   merge the fix into every pipeline branch with explicit merge commits.
//!
//! ## Usage
//!
//! ```bash
//! flow-release                       # promote main to staging
//! flow-ship minor                    # ship staging as the next minor version
//! flow-hotfix start auth-bug         # cut hotfix/auth-bug from production
//! flow-hotfix finish patch Fix token expiry
//! ```
//!
//! Flows are written against the [`GitOperations`] and [`ScriptRunner`]
//! capabilities, so they run unchanged against [`git::InMemoryGit`] in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod changelog;
pub mod changeset;
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod gate;
pub mod git;
pub mod prompt;
pub mod version;

pub use config::FlowConfig;
pub use error::{FlowError, Result};
pub use flow::{FlowContext, FlowOutcome};
pub use gate::{PackageScripts, QualityGate, ScriptRunner};
pub use git::{GitOperations, InMemoryGit, RepositoryContext, SystemGit};
pub use prompt::{Prompter, StreamPrompter};
pub use version::{VersionBump, bump_version};
