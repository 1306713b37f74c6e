//! Command line argument parsing for the three flow binaries.
//!
//! Each binary has its own parser. Usage errors exit with 1 rather than clap's
//! default of 2; `--help` and `--version` exit with 0.

use crate::version::VersionBump;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsString;

/// Promote main to staging after the quality gate passes
#[derive(Parser, Debug)]
#[command(
    name = "flow-release",
    version,
    about = "Promote main to staging after the quality gate passes",
    long_about = "Validate main, commit any auto-fix changes and fast-forward staging to main.

Usage:
  flow-release
  flow-release tidy imports after lint fix"
)]
pub struct ReleaseArgs {
    /// Message for the fix-up commit (words are joined with spaces)
    #[arg(value_name = "MESSAGE", trailing_var_arg = true)]
    pub message: Vec<String>,
}

impl ReleaseArgs {
    /// Joined message, or `None` when no words were given
    pub fn message(&self) -> Option<String> {
        join_words(&self.message)
    }
}

/// Bump kinds accepted by `flow-ship`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShipKind {
    /// Bug fixes only
    Patch,
    /// Backwards compatible features
    Minor,
    /// Breaking changes
    Major,
}

impl From<ShipKind> for VersionBump {
    fn from(kind: ShipKind) -> Self {
        match kind {
            ShipKind::Patch => VersionBump::Patch,
            ShipKind::Minor => VersionBump::Minor,
            ShipKind::Major => VersionBump::Major,
        }
    }
}

/// Version staging and ship it to production
#[derive(Parser, Debug)]
#[command(
    name = "flow-ship",
    version,
    about = "Version staging and ship it to production",
    long_about = "Bump the package version, write a changelog section and promote
staging to production, then carry the release commit back to main and staging.

Usage:
  flow-ship patch
  flow-ship minor
  flow-ship major"
)]
pub struct ShipArgs {
    /// Version bump to apply
    #[arg(value_enum, value_name = "KIND")]
    pub kind: ShipKind,
}

/// Bump kinds accepted by `flow-hotfix finish`. Hotfixes never break compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HotfixKind {
    /// Bug fixes only
    Patch,
    /// Backwards compatible features
    Minor,
}

impl From<HotfixKind> for VersionBump {
    fn from(kind: HotfixKind) -> Self {
        match kind {
            HotfixKind::Patch => VersionBump::Patch,
            HotfixKind::Minor => VersionBump::Minor,
        }
    }
}

/// Emergency fixes branched from production
#[derive(Parser, Debug)]
#[command(name = "flow-hotfix", version, about = "Emergency fixes branched from production")]
pub struct HotfixArgs {
    /// Hotfix step to run
    #[command(subcommand)]
    pub command: HotfixCommand,
}

/// Hotfix subcommands
#[derive(Subcommand, Debug)]
pub enum HotfixCommand {
    /// Create hotfix/<NAME> from production
    Start {
        /// Hotfix name, appended to the hotfix branch prefix
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Version, merge into production, staging and main, and delete the branch
    Finish {
        /// Version bump to apply
        #[arg(value_enum, value_name = "KIND")]
        kind: HotfixKind,

        /// Changelog text (words are joined with spaces)
        #[arg(value_name = "MESSAGE", required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
}

/// Join trailing words with single spaces; blank input gives `None`
pub fn join_words(words: &[String]) -> Option<String> {
    let joined = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Parse `argv`, printing usage on failure.
///
/// On failure returns the exit code to use: 0 for help/version, 1 otherwise.
pub fn parse_from<T, I, A>(argv: I) -> Result<T, i32>
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    T::try_parse_from(argv).map_err(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        if let Err(io) = e.print() {
            log::debug!("Could not print usage: {io}");
        }
        code
    })
}
