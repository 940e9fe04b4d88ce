//! # Validate Command Implementation
//!
//! Loads a manifest exactly as `update` would and reports what it contains,
//! without cloning or writing anything. Every structural problem `update`
//! would reject (unknown target shapes, files with neither a source nor a
//! template, unsafe paths) is reported here too.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use tree_sitter_vendor::config::{self, FileEntry, DEFAULT_CONFIG_FILENAME};
use tree_sitter_vendor::output::{counted, emoji, OutputConfig};

/// Validate a manifest
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the manifest to validate.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TREE_SITTER_VENDOR_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating manifest: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.config.display()
    );

    let manifest = match config::from_file(&args.config) {
        Ok(manifest) => manifest,
        Err(e) => {
            println!("{} {}", emoji(&out, "❌", "[ERR]"), e);
            return Err(anyhow::anyhow!("Manifest validation failed: {}", e));
        }
    };

    let (copies, templates) = manifest
        .repositories
        .iter()
        .flat_map(|r| &r.targets)
        .flat_map(|t| &t.files)
        .fold((0, 0), |(copies, templates), file| match file {
            FileEntry::Copy { .. } => (copies + 1, templates),
            FileEntry::Template { .. } => (copies, templates + 1),
        });
    let generated = manifest
        .repositories
        .iter()
        .filter(|r| r.run_generate)
        .count();

    println!("{} Manifest is valid", emoji(&out, "✅", "[OK]"));
    println!(
        "   {}",
        counted(manifest.repositories.len(), "repository", "repositories")
    );
    println!("   {}", counted(manifest.target_count(), "target", "targets"));
    println!(
        "   {} ({} copied, {} templated)",
        counted(manifest.file_count(), "file", "files"),
        copies,
        templates
    );
    if generated > 0 {
        println!(
            "   {} regenerated with tree-sitter",
            counted(generated, "repository", "repositories")
        );
    }
    Ok(())
}
