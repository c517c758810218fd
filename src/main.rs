// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! api-mirror CLI
//!
//! Keeps a local copy of the API and serves it

use api_mirror::cli::{Cli, Runner};
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

/// Exit code for bad input
const USER_ERROR: i32 = 9;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => USER_ERROR,
            };
            // Clap formats help, version and usage errors itself
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        let code = if e.is_user_error() { USER_ERROR } else { 1 };
        std::process::exit(code);
    }
}
