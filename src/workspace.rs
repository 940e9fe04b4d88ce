//! Scoped temporary workspace for upstream checkouts.
//!
//! A [`Workspace`] is created once per run and handed to the fetcher. It owns
//! its directory: dropping the handle deletes it, so an early return or an
//! unwinding panic cleans up the same way a successful run does. Call
//! [`Workspace::close`] on the success path to surface removal errors.

use crate::config::repository_directory_name;
use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of the temporary directory name.
pub const WORKSPACE_PREFIX: &str = "TreeSitterLanguages-";

/// Temporary directory holding one checkout per repository.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace in the system temporary directory.
    pub fn create() -> Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a workspace inside `parent`.
    pub fn create_in<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent.as_ref())
            .map_err(|e| Error::Filesystem {
                message: format!(
                    "Failed to create workspace in '{}': {}",
                    parent.as_ref().display(),
                    e
                ),
            })?;
        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Checkout directory for a repository identifier such as `owner/repo`.
    pub fn repository_dir(&self, repository: &str) -> PathBuf {
        self.path().join(repository_directory_name(repository))
    }

    /// Delete the workspace, reporting any failure.
    pub fn close(self) -> Result<()> {
        let path = self.path().to_path_buf();
        self.dir.close().map_err(|e| Error::Filesystem {
            message: format!("Failed to remove workspace '{}': {}", path.display(), e),
        })?;
        debug!("Removed workspace {}", path.display());
        Ok(())
    }
}
