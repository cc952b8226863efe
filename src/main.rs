//! jsdoc2md CLI entry point
//!
//! Parses arguments, runs the selected operation and turns any failure into
//! a colored message with a suggestion before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use jsdoc2md::cli;
use jsdoc2md::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
