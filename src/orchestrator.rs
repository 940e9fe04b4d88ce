//! # Run Orchestration
//!
//! Drives a full update: one workspace per run, then for each repository in
//! manifest order a fetch followed by materialization of its targets.
//!
//! Processing is sequential and stops at the first error. Targets written
//! before the failure stay on disk; the workspace is removed either way.

use crate::config::Manifest;
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::materialize::{MaterializeSummary, Materializer};
use crate::repository::RepositoryFetcher;
use crate::template::TemplateStore;
use crate::workspace::Workspace;
use log::info;
use std::path::PathBuf;

/// Where a run writes and where it keeps its checkouts.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Destination root, one subdirectory per target.
    pub output_root: PathBuf,
    /// Parent of the temporary workspace; the system temp dir when `None`.
    pub workspace_parent: Option<PathBuf>,
}

impl RunOptions {
    pub fn new<P: Into<PathBuf>>(output_root: P) -> Self {
        Self {
            output_root: output_root.into(),
            workspace_parent: None,
        }
    }

    pub fn workspace_parent<P: Into<PathBuf>>(mut self, parent: P) -> Self {
        self.workspace_parent = Some(parent.into());
        self
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub repositories: usize,
    pub targets: usize,
    pub files_copied: usize,
    pub files_rendered: usize,
    pub copies_skipped: usize,
}

impl RunSummary {
    fn add_repository(&mut self, targets: usize, files: MaterializeSummary) {
        self.repositories += 1;
        self.targets += targets;
        self.files_copied += files.copied;
        self.files_rendered += files.rendered;
        self.copies_skipped += files.skipped;
    }
}

/// Fetch every repository of `manifest` and write its targets below
/// `options.output_root`.
pub fn run(
    manifest: &Manifest,
    fetcher: &RepositoryFetcher,
    templates: &TemplateStore,
    fs: &mut dyn FileSystem,
    options: &RunOptions,
) -> Result<RunSummary> {
    let workspace = match &options.workspace_parent {
        Some(parent) => Workspace::create_in(parent)?,
        None => Workspace::create()?,
    };

    let mut summary = RunSummary::default();
    for repository in &manifest.repositories {
        let checkout_dir = fetcher.fetch(repository, &workspace, fs)?;

        let files = Materializer::new(fs, templates, &options.output_root)
            .materialize_repository(repository, &checkout_dir)?;
        info!(
            "{}: {} targets, {} copied, {} rendered, {} skipped",
            repository.name,
            repository.targets.len(),
            files.copied,
            files.rendered,
            files.skipped
        );
        summary.add_repository(repository.targets.len(), files);
    }

    workspace.close()?;
    Ok(summary)
}
