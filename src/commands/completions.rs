//! # Completions Command Implementation
//!
//! Prints a shell completion script for `tree-sitter-vendor` to stdout,
//! generated by `clap_complete` from the CLI definition.
//!
//! ```bash
//! tree-sitter-vendor completions bash > ~/.local/share/bash-completion/completions/tree-sitter-vendor
//! tree-sitter-vendor completions zsh > ~/.zfunc/_tree-sitter-vendor
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "tree-sitter-vendor", &mut io::stdout());
    Ok(())
}
