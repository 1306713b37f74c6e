//! Command execution for the flow binaries.
//!
//! Each entry point parses its own arguments, opens the repository, runs one
//! flow and turns the result into a process exit code.

mod helpers;

use crate::cli::args::{HotfixArgs, HotfixCommand, ReleaseArgs, ShipArgs, join_words, parse_from};
use crate::error::{CliError, Result};
use crate::flow::{self, FlowOutcome};
use crate::prompt;
use helpers::Session;
use std::ffi::OsString;

/// Run `flow-release` with the given argv
pub async fn run_release<I, A>(argv: I) -> i32
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let args: ReleaseArgs = match parse_from(argv) {
        Ok(args) => args,
        Err(code) => return code,
    };

    helpers::report("flow-release", release(args).await)
}

async fn release(args: ReleaseArgs) -> Result<FlowOutcome> {
    let session = Session::open().await?;
    let message = args.message();
    flow::release::run(&session.context(), message.as_deref()).await
}

/// Run `flow-ship` with the given argv
pub async fn run_ship<I, A>(argv: I) -> i32
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let args: ShipArgs = match parse_from(argv) {
        Ok(args) => args,
        Err(code) => return code,
    };

    helpers::report("flow-ship", ship(args).await)
}

async fn ship(args: ShipArgs) -> Result<FlowOutcome> {
    let session = Session::open().await?;
    let mut prompter = prompt::terminal();
    flow::ship::run(&session.context(), args.kind.into(), &mut prompter).await
}

/// Run `flow-hotfix` with the given argv
pub async fn run_hotfix<I, A>(argv: I) -> i32
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let args: HotfixArgs = match parse_from(argv) {
        Ok(args) => args,
        Err(code) => return code,
    };

    helpers::report("flow-hotfix", hotfix(args).await)
}

async fn hotfix(args: HotfixArgs) -> Result<FlowOutcome> {
    match args.command {
        HotfixCommand::Start { name } => {
            let session = Session::open().await?;
            flow::hotfix::start(&session.context(), &name).await
        }
        HotfixCommand::Finish { kind, message } => {
            let message = require_message(&message)?;
            let session = Session::open().await?;
            flow::hotfix::finish(&session.context(), kind.into(), &message).await
        }
    }
}

fn require_message(words: &[String]) -> Result<String> {
    join_words(words).ok_or_else(|| {
        CliError::MissingArgument {
            argument: "MESSAGE".to_string(),
        }
        .into()
    })
}

/// Exit code for a finished flow
fn outcome_code(outcome: FlowOutcome) -> i32 {
    match outcome {
        FlowOutcome::Completed | FlowOutcome::Declined => 0,
    }
}
