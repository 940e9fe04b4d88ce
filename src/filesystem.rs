//! File system capability used by the fetcher and the materializer.
//!
//! All file manipulation during a run goes through the [`FileSystem`] trait so
//! that the copy and template rules can be exercised against [`MemoryFS`] in
//! tests. [`HostFs`] is the real implementation.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Operations the vendoring pipeline needs from a file system.
///
/// Paths are used as given; implementations do not resolve them against a
/// working directory of their own.
pub trait FileSystem {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a file or a directory tree. Missing paths are not an error.
    fn remove_all(&mut self, path: &Path) -> Result<()>;

    /// Create a directory and all of its parents.
    fn create_dir_all(&mut self, path: &Path) -> Result<()>;

    /// Copy a file, or a directory and everything below it, to `to`.
    ///
    /// `to` must not exist yet; the copy takes its name.
    fn copy_recursive(&mut self, from: &Path, to: &Path) -> Result<()>;

    /// Names of the entries directly inside `path`, sorted.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Write `contents` to a file, replacing it if present. The parent
    /// directory must exist.
    fn write(&mut self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// The host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl HostFs {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(action: &str, path: &Path, e: impl std::fmt::Display) -> Error {
    Error::Filesystem {
        message: format!("Failed to {} '{}': {}", action, path.display(), e),
    }
}

impl FileSystem for HostFs {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_all(&mut self, path: &Path) -> Result<()> {
        let metadata = match path.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_error("inspect", path, e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|e| io_error("remove", path, e))
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| io_error("create directory", path, e))
    }

    fn copy_recursive(&mut self, from: &Path, to: &Path) -> Result<()> {
        if !from.is_dir() {
            fs::copy(from, to).map_err(|e| io_error("copy", from, e))?;
            return Ok(());
        }

        // Symlinks are dereferenced; the copy holds the linked content.
        for entry in WalkDir::new(from).follow_links(true) {
            let entry = entry.map_err(|e| io_error("walk", from, e))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| io_error("relativize", entry.path(), e))?;
            let destination = to.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination)
                    .map_err(|e| io_error("create directory", &destination, e))?;
            } else {
                fs::copy(entry.path(), &destination)
                    .map_err(|e| io_error("copy", entry.path(), e))?;
            }
        }

        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| io_error("read directory", path, e))? {
            let entry = entry.map_err(|e| io_error("read directory", path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).map_err(|e| io_error("write", path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| io_error("read", path, e))
    }
}

/// Represents a file held by [`MemoryFS`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
}

impl File {
    /// Create a new file with content
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Create a new file from string content
    pub fn from_string(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }
}

/// In-memory file system.
///
/// Directories exist either because they were created explicitly or because
/// a file lives somewhere below them.
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    files: BTreeMap<PathBuf, File>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file, without checking for a parent directory
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, file: File) {
        self.files.insert(path.as_ref().to_path_buf(), file);
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) {
        self.add_file(path, File::from_string(content));
    }

    /// Get a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        self.files.get(path.as_ref())
    }

    /// Get a file's content as a string, if it exists and is UTF-8
    pub fn read_string<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.get_file(path)
            .and_then(|f| String::from_utf8(f.content.clone()).ok())
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn is_root(path: &Path) -> bool {
        path.as_os_str().is_empty() || path.parent().is_none()
    }

    fn not_found(path: &Path) -> Error {
        Error::Filesystem {
            message: format!("No such file or directory: {}", path.display()),
        }
    }
}

impl FileSystem for MemoryFS {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        Self::is_root(path)
            || self.dirs.contains(path)
            || self
                .files
                .keys()
                .chain(self.dirs.iter())
                .any(|p| p != path && p.starts_with(path))
    }

    fn remove_all(&mut self, path: &Path) -> Result<()> {
        self.files.retain(|p, _| !p.starts_with(path));
        self.dirs.retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        for ancestor in path.ancestors() {
            if Self::is_root(ancestor) {
                break;
            }
            if self.files.contains_key(ancestor) {
                return Err(Error::Filesystem {
                    message: format!("Not a directory: {}", ancestor.display()),
                });
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn copy_recursive(&mut self, from: &Path, to: &Path) -> Result<()> {
        if let Some(file) = self.files.get(from).cloned() {
            self.files.insert(to.to_path_buf(), file);
            return Ok(());
        }
        if !self.is_dir(from) {
            return Err(Self::not_found(from));
        }

        let files: Vec<(PathBuf, File)> = self
            .files
            .iter()
            .filter_map(|(p, f)| {
                p.strip_prefix(from)
                    .ok()
                    .map(|relative| (to.join(relative), f.clone()))
            })
            .collect();
        let dirs: Vec<PathBuf> = self
            .dirs
            .iter()
            .filter_map(|p| p.strip_prefix(from).ok().map(|relative| to.join(relative)))
            .collect();

        self.dirs.insert(to.to_path_buf());
        self.dirs.extend(dirs);
        self.files.extend(files);
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        if self.files.contains_key(path) || !self.is_dir(path) {
            return Err(Error::Filesystem {
                message: format!("Not a directory: {}", path.display()),
            });
        }

        let names: BTreeSet<String> = self
            .files
            .keys()
            .chain(self.dirs.iter())
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter_map(|relative| relative.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !self.is_dir(parent) {
                return Err(Self::not_found(parent));
            }
        }
        if self.dirs.contains(path) {
            return Err(Error::Filesystem {
                message: format!("Is a directory: {}", path.display()),
            });
        }
        self.files
            .insert(path.to_path_buf(), File::new(contents.to_vec()));
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| Self::not_found(path))
    }
}
