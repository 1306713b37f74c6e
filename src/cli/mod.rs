//! Command line interface for the promotion flows.
//!
//! The three binaries are thin wrappers around [`run_release`], [`run_ship`]
//! and [`run_hotfix`], which return the process exit code.

mod args;
mod commands;
mod output;

pub use args::{
    HotfixArgs, HotfixCommand, HotfixKind, ReleaseArgs, ShipArgs, ShipKind, join_words, parse_from,
};
pub use commands::{run_hotfix, run_release, run_ship};
pub use output::OutputManager;
