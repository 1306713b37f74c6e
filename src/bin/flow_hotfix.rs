//! flow-hotfix - Start and finish hotfix branches cut from production.

use promotion_flow::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();
    process::exit(cli::run_hotfix(std::env::args_os()).await);
}
