//! # Repository Fetching
//!
//! This module provides the `RepositoryFetcher`, which turns a manifest
//! `Repository` into a clean local checkout inside the run's workspace.
//!
//! ## Design
//!
//! The fetcher is built around two capability traits so that tests can swap
//! in fakes instead of running real processes:
//!
//! - **`VersionControlClient`**: clones an upstream repository into a
//!   directory. `GitClient` wraps the system `git` command.
//!
//! - **`ParserGenerator`**: regenerates parser sources inside a checkout.
//!   `TreeSitterGenerator` runs `npm install` followed by
//!   `tree-sitter generate`.
//!
//! Directory preparation goes through the `FileSystem` trait. Every failure is
//! returned immediately; a half-fetched checkout is never materialized.

use crate::config::Repository;
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::git;
use crate::workspace::Workspace;
use log::info;
use std::path::{Path, PathBuf};

/// Clones upstream repositories.
pub trait VersionControlClient {
    /// Clone the default branch of `name` (an `owner/repo` identifier) into
    /// `target_dir`, which exists and is empty.
    fn clone_repository(&self, name: &str, target_dir: &Path) -> Result<()>;
}

/// Regenerates parser sources from a grammar.
pub trait ParserGenerator {
    /// Run the upstream generation step inside `checkout_dir`.
    fn generate(&self, checkout_dir: &Path) -> Result<()>;
}

/// `VersionControlClient` backed by the system `git` command.
#[derive(Debug, Clone)]
pub struct GitClient {
    remote_base: String,
}

impl GitClient {
    pub fn new<S: Into<String>>(remote_base: S) -> Self {
        Self {
            remote_base: remote_base.into(),
        }
    }
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new(git::DEFAULT_REMOTE_BASE)
    }
}

impl VersionControlClient for GitClient {
    fn clone_repository(&self, name: &str, target_dir: &Path) -> Result<()> {
        git::clone_default_branch(&git::remote_url(&self.remote_base, name), target_dir)
    }
}

/// `ParserGenerator` running the tree-sitter CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterGenerator;

impl ParserGenerator for TreeSitterGenerator {
    fn generate(&self, checkout_dir: &Path) -> Result<()> {
        git::tree_sitter_generate(checkout_dir)
    }
}

/// Produces checkouts for manifest repositories.
pub struct RepositoryFetcher {
    vcs: Box<dyn VersionControlClient>,
    generator: Box<dyn ParserGenerator>,
    skip_generate: bool,
}

impl RepositoryFetcher {
    /// Fetcher using `git` with the given remote base and the tree-sitter CLI.
    pub fn new<S: Into<String>>(remote_base: S) -> Self {
        Self::with_operations(
            Box::new(GitClient::new(remote_base)),
            Box::new(TreeSitterGenerator),
        )
    }

    /// Fetcher with custom implementations, e.g. fakes in tests.
    pub fn with_operations(
        vcs: Box<dyn VersionControlClient>,
        generator: Box<dyn ParserGenerator>,
    ) -> Self {
        Self {
            vcs,
            generator,
            skip_generate: false,
        }
    }

    /// Never run the generator, even for repositories that ask for it.
    pub fn skip_generate(mut self, skip: bool) -> Self {
        self.skip_generate = skip;
        self
    }

    /// Clone `repository` into `workspace`, replacing any stale checkout, and
    /// regenerate its sources if requested. Returns the checkout directory.
    pub fn fetch(
        &self,
        repository: &Repository,
        workspace: &Workspace,
        fs: &mut dyn FileSystem,
    ) -> Result<PathBuf> {
        let checkout_dir = workspace.repository_dir(&repository.name);
        self.fetch_into(repository, &checkout_dir, fs)?;
        Ok(checkout_dir)
    }

    /// Like [`fetch`](Self::fetch) with an explicit checkout directory.
    pub fn fetch_into(
        &self,
        repository: &Repository,
        checkout_dir: &Path,
        fs: &mut dyn FileSystem,
    ) -> Result<()> {
        fs.remove_all(checkout_dir)?;
        fs.create_dir_all(checkout_dir)?;

        info!("Cloning {}...", repository.name);
        self.vcs.clone_repository(&repository.name, checkout_dir)?;

        if repository.run_generate {
            if self.skip_generate {
                info!("Skipping parser generation for {}", repository.name);
            } else {
                info!(
                    "Running `tree-sitter generate` in {}",
                    checkout_dir.display()
                );
                self.generator.generate(checkout_dir)?;
            }
        }

        Ok(())
    }
}
