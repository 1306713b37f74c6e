//! flow-release - Promote main to staging.

use promotion_flow::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();
    process::exit(cli::run_release(std::env::args_os()).await);
}
