//! # tree-sitter-vendor
//!
//! Binary entry point. Parses arguments with `clap`, sets up logging and hands
//! off to the subcommand. All vendoring logic lives in the library crate.
//!
//! An error returned from a command ends the process with exit status 1.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
