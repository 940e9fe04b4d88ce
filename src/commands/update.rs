//! Update command implementation
//!
//! Runs the whole pipeline: load the manifest, then for every repository
//! clone it into a temporary workspace, regenerate the parser if requested,
//! and rewrite its targets under the output directory.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use tree_sitter_vendor::config::{self, DEFAULT_CONFIG_FILENAME, DEFAULT_OUTPUT_DIR};
use tree_sitter_vendor::filesystem::HostFs;
use tree_sitter_vendor::git::DEFAULT_REMOTE_BASE;
use tree_sitter_vendor::orchestrator::{self, RunOptions};
use tree_sitter_vendor::output::{counted, emoji, OutputConfig};
use tree_sitter_vendor::repository::RepositoryFetcher;
use tree_sitter_vendor::template::TemplateStore;

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Path to the manifest
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TREE_SITTER_VENDOR_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Destination root; each target becomes a subdirectory
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "TREE_SITTER_VENDOR_OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output: PathBuf,

    /// Load templates from this directory instead of the built-in ones
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Prefix for clone URLs, followed by `owner/repo.git`
    #[arg(long, value_name = "URL", default_value = DEFAULT_REMOTE_BASE)]
    pub remote_base: String,

    /// Never run `tree-sitter generate`, even where the manifest asks for it
    #[arg(long)]
    pub skip_generate: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the update command
pub fn execute(args: UpdateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let manifest = config::from_file(&args.config)?;
    if !args.quiet {
        println!(
            "{} Updating {} from {}",
            emoji(&out, "🌳", "[UPDATE]"),
            counted(
                manifest.repositories.len(),
                "repository",
                "repositories"
            ),
            args.config.display()
        );
    }

    let templates = match &args.templates {
        Some(dir) => {
            if !dir.is_dir() {
                anyhow::bail!("Template directory not found: {}", dir.display());
            }
            TemplateStore::from_dir(dir)
        }
        None => TemplateStore::builtin(),
    };
    let fetcher = RepositoryFetcher::new(args.remote_base).skip_generate(args.skip_generate);

    let result = orchestrator::run(
        &manifest,
        &fetcher,
        &templates,
        &mut HostFs::new(),
        &RunOptions::new(&args.output),
    );

    match result {
        Ok(summary) => {
            if !args.quiet {
                println!(
                    "{} Updated {} in {:.2}s",
                    emoji(&out, "✅", "[OK]"),
                    counted(summary.targets, "target", "targets"),
                    start_time.elapsed().as_secs_f64()
                );
                println!(
                    "   {} copied, {} rendered, {} skipped",
                    summary.files_copied, summary.files_rendered, summary.copies_skipped
                );
                println!("   Files written to: {}", args.output.display());
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!("{} Update failed", emoji(&out, "❌", "[ERR]"));
            }
            Err(e.into())
        }
    }
}
