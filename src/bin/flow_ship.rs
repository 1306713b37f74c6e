//! flow-ship - Version staging and ship it to production.

use promotion_flow::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();
    process::exit(cli::run_ship(std::env::args_os()).await);
}
