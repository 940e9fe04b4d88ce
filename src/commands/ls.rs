//! # Ls Command Implementation
//!
//! Prints the normalized manifest: every target with the files it will
//! receive and where each comes from. Shorthand entries are shown expanded.
//! Nothing is fetched or written.

use anyhow::Result;
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

use tree_sitter_vendor::config::{self, FileEntry, Manifest, TemplateFill, DEFAULT_CONFIG_FILENAME};

/// List the targets and files a manifest describes
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to the manifest.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TREE_SITTER_VENDOR_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Only print target names.
    #[arg(long)]
    pub targets_only: bool,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs) -> Result<()> {
    let manifest = config::from_file(&args.config)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_listing(&mut handle, &manifest, args.targets_only)?;
    Ok(())
}

fn write_listing<W: Write>(w: &mut W, manifest: &Manifest, targets_only: bool) -> io::Result<()> {
    for repository in &manifest.repositories {
        if targets_only {
            for target in &repository.targets {
                writeln!(w, "{}", target.name)?;
            }
            continue;
        }

        let generate = if repository.run_generate {
            " (tree-sitter generate)"
        } else {
            ""
        };
        writeln!(w, "{}{}", repository.name, generate)?;
        for target in &repository.targets {
            writeln!(w, "  {}/", target.name)?;
            for file in &target.files {
                writeln!(w, "    {}  <- {}", file.file_path(), describe_source(file))?;
            }
        }
    }
    Ok(())
}

fn describe_source(file: &FileEntry) -> String {
    match file {
        FileEntry::Copy {
            source_file_path, ..
        } => source_file_path.clone(),
        FileEntry::Template {
            template,
            fill: TemplateFill::ScannedDirectory(dir),
            ..
        } => format!("template {} listing {}/", template, dir),
        FileEntry::Template { template, .. } => format!("template {}", template),
    }
}
