//! CLI argument parsing and command dispatch

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// Vendor tree-sitter grammars into a Swift package
#[derive(Parser, Debug)]
#[command(name = "tree-sitter-vendor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch every repository in the manifest and rewrite its targets
    Update(commands::update::UpdateArgs),

    /// Load and check a manifest without fetching anything
    Validate(commands::validate::ValidateArgs),

    /// Print the targets and files a manifest describes
    Ls(commands::ls::LsArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let mut level = parse_log_level(&self.log_level)?;
        if matches!(&self.command, Commands::Update(args) if args.quiet) {
            level = level.min(LevelFilter::Error);
        }
        init_logging(level);

        match self.command {
            Commands::Update(args) => commands::update::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Ls(args) => commands::ls::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn parse_log_level(level: &str) -> Result<LevelFilter> {
    level.parse().map_err(|_| {
        anyhow!(
            "Invalid log level '{}': expected off, error, warn, info, debug or trace",
            level
        )
    })
}

fn init_logging(level: LevelFilter) {
    // A logger may already be installed when commands run inside unit tests.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .try_init();
}
