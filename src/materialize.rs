//! # Target Materialization
//!
//! Writes a repository's targets into the destination tree. Each
//! `FileEntry` lands at `<output root>/<target name>/<file path>` and is
//! produced by one of two strategies:
//!
//! - **Copy**: the destination is removed, then the file or directory at the
//!   same relative path inside the checkout is copied over. If the checkout
//!   does not have that path, the entry is skipped and the destination stays
//!   absent. Upstream grammars routinely omit optional files such as
//!   `src/scanner.cc`, so a skip is only logged as a warning.
//!
//! - **Template**: the destination is removed, the named template is rendered
//!   and written. The accessor listing scans a directory of the *destination*
//!   target, which an earlier copy entry of the same target has filled.
//!
//! Destination content is always regenerated output: nothing is merged, and
//! a failure leaves earlier targets as they were written.

use crate::config::{FileEntry, Repository, Target, TemplateFill};
use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::template::{self, TemplateStore};
use log::{debug, info, warn};
use std::path::Path;

/// What happened to a single file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Copied from the checkout.
    Copied,
    /// Rendered from a template.
    Rendered,
    /// The copy source does not exist in the checkout.
    Skipped,
}

/// Counts of file outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub copied: usize,
    pub rendered: usize,
    pub skipped: usize,
}

impl MaterializeSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Copied => self.copied += 1,
            FileOutcome::Rendered => self.rendered += 1,
            FileOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn add(&mut self, other: MaterializeSummary) {
        self.copied += other.copied;
        self.rendered += other.rendered;
        self.skipped += other.skipped;
    }
}

/// Writes targets below an output root.
pub struct Materializer<'a> {
    fs: &'a mut dyn FileSystem,
    templates: &'a TemplateStore,
    output_root: &'a Path,
}

impl<'a> Materializer<'a> {
    pub fn new(
        fs: &'a mut dyn FileSystem,
        templates: &'a TemplateStore,
        output_root: &'a Path,
    ) -> Self {
        Self {
            fs,
            templates,
            output_root,
        }
    }

    /// Materialize every target of `repository` from `checkout_dir`, in order.
    pub fn materialize_repository(
        &mut self,
        repository: &Repository,
        checkout_dir: &Path,
    ) -> Result<MaterializeSummary> {
        let mut summary = MaterializeSummary::default();
        for target in &repository.targets {
            summary.add(self.materialize_target(target, checkout_dir)?);
        }
        Ok(summary)
    }

    /// Materialize one target, files in declaration order.
    pub fn materialize_target(
        &mut self,
        target: &Target,
        checkout_dir: &Path,
    ) -> Result<MaterializeSummary> {
        info!("Writing target {}", target.name);
        let target_dir = self.output_root.join(&target.name);

        let mut summary = MaterializeSummary::default();
        for file in &target.files {
            summary.record(self.materialize_file(&target_dir, checkout_dir, file)?);
        }
        Ok(summary)
    }

    /// Materialize a single entry into `target_dir`.
    pub fn materialize_file(
        &mut self,
        target_dir: &Path,
        checkout_dir: &Path,
        file: &FileEntry,
    ) -> Result<FileOutcome> {
        let destination = target_dir.join(file.file_path());
        match file {
            FileEntry::Copy {
                source_file_path, ..
            } => self.copy(&checkout_dir.join(source_file_path), &destination),
            FileEntry::Template { template, fill, .. } => {
                self.render(target_dir, template, fill, &destination)
            }
        }
    }

    fn copy(&mut self, source: &Path, destination: &Path) -> Result<FileOutcome> {
        if self.fs.exists(destination) {
            self.fs
                .remove_all(destination)
                .map_err(|e| materialize_error(destination, e))?;
        }

        if !self.fs.exists(source) {
            warn!(
                "Skipping {}: {} does not exist upstream",
                destination.display(),
                source.display()
            );
            return Ok(FileOutcome::Skipped);
        }

        self.ensure_parent(destination)?;
        self.fs
            .copy_recursive(source, destination)
            .map_err(|e| materialize_error(destination, e))?;
        debug!("Copied {} -> {}", source.display(), destination.display());
        Ok(FileOutcome::Copied)
    }

    fn render(
        &mut self,
        target_dir: &Path,
        template_name: &str,
        fill: &TemplateFill,
        destination: &Path,
    ) -> Result<FileOutcome> {
        self.fs
            .remove_all(destination)
            .map_err(|e| materialize_error(destination, e))?;

        let text = self.templates.load(template_name)?;
        let contents = match fill {
            TemplateFill::Variables(variables) => {
                let rendered = template::render_variables(&text, variables);
                let unresolved = template::unresolved_placeholders(&rendered)?;
                if !unresolved.is_empty() {
                    warn!(
                        "{} still contains placeholders after rendering {}: {}",
                        destination.display(),
                        template_name,
                        unresolved.join(", ")
                    );
                }
                rendered
            }
            TemplateFill::ScannedDirectory(directory) => {
                let scanned = target_dir.join(directory);
                let filenames = self.query_files(&scanned)?;
                template::render_accessor_listing(&text, &filenames)?
            }
        };

        self.ensure_parent(destination)?;
        self.fs
            .write(destination, contents.as_bytes())
            .map_err(|e| materialize_error(destination, e))?;
        debug!("Rendered {} -> {}", template_name, destination.display());
        Ok(FileOutcome::Rendered)
    }

    /// Plain files directly inside `dir`, sorted by name.
    fn query_files(&self, dir: &Path) -> Result<Vec<String>> {
        if !self.fs.is_dir(dir) {
            return Err(Error::Materialize {
                path: dir.display().to_string(),
                message: "scanned directory does not exist".to_string(),
            });
        }
        let names = self
            .fs
            .list_dir(dir)
            .map_err(|e| materialize_error(dir, e))?;
        Ok(names
            .into_iter()
            .filter(|name| !self.fs.is_dir(&dir.join(name)))
            .collect())
    }

    fn ensure_parent(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| materialize_error(parent, e))?;
        }
        Ok(())
    }
}

fn materialize_error(path: &Path, error: Error) -> Error {
    Error::Materialize {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
