//! Shared test utilities for the CLI end-to-end tests.
//!
//! Add `mod common;` to a test file, then:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_config(manifests::SHORTHAND);
//! fixture.command().arg("validate").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::GrammarRepo;
    pub use super::TestFixture;
}

/// Manifest documents used across tests.
#[allow(dead_code)]
pub mod manifests {
    /// One repository using the shorthand target form.
    pub const SHORTHAND: &str = r#"{
  "repositories": [
    {
      "name": "owner/tree-sitter-foo",
      "targets": { "baseName": "Foo", "treeSitterFunctionName": "tree_sitter_foo" }
    }
  ]
}"#;

    /// One repository with an explicit target list.
    pub const EXPLICIT: &str = r#"{
  "repositories": [
    {
      "name": "owner/tree-sitter-bar",
      "targets": [
        {
          "name": "Bar",
          "files": [
            { "filePath": "src/parser.c", "sourceFilePath": "src/parser.c" },
            { "filePath": "include/bar.h", "template": "public.h", "variables": { "name": "tree_sitter_bar" } }
          ]
        }
      ]
    }
  ]
}"#;

    /// Shorthand missing `treeSitterFunctionName`.
    pub const INCOMPLETE_SHORTHAND: &str = r#"{
  "repositories": [
    { "name": "owner/tree-sitter-foo", "targets": { "baseName": "Foo" } }
  ]
}"#;

    /// Not JSON at all.
    pub const INVALID_JSON: &str = "{ \"repositories\": [ ";

    /// No repositories.
    pub const EMPTY: &str = r#"{ "repositories": [] }"#;
}

/// A temporary directory with an optional `config.json`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `config.json` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("config.json")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.json")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tree-sitter-vendor");
        cmd.current_dir(self.path())
            .env_remove("TREE_SITTER_VENDOR_CONFIG")
            .env_remove("TREE_SITTER_VENDOR_OUTPUT");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A local git repository laid out like an upstream grammar, reachable as
/// `<remote base><owner>/<name>.git`.
#[allow(dead_code)]
pub struct GrammarRepo {
    root: assert_fs::TempDir,
}

#[allow(dead_code)]
impl GrammarRepo {
    /// Create `<root>/<owner>/<name>.git` with parser sources and queries.
    pub fn new(owner: &str, name: &str) -> Self {
        let root = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let repo = root.child(format!("{}/{}.git", owner, name));

        for (path, content) in [
            ("src/parser.c", "// generated parser\n"),
            ("src/tree_sitter/parser.h", "// parser.h\n"),
            ("queries/highlights.scm", "(comment) @comment\n"),
            ("queries/json-schema.scm", "(pair) @property\n"),
            ("queries/README.md", "not a query\n"),
        ] {
            repo.child(path).write_str(content).expect("Failed to write grammar file");
        }

        git(repo.path(), &["init", "--quiet"]);
        git(repo.path(), &["add", "."]);
        git(
            repo.path(),
            &[
                "-c",
                "user.name=Test",
                "-c",
                "user.email=test@example.com",
                "commit",
                "--quiet",
                "-m",
                "grammar",
            ],
        );

        Self { root }
    }

    /// Value for `--remote-base`.
    pub fn remote_base(&self) -> String {
        format!("{}/", self.root.path().display())
    }
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config(manifests::EMPTY);
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_manifests_are_valid_json() {
        for manifest in [
            manifests::SHORTHAND,
            manifests::EXPLICIT,
            manifests::INCOMPLETE_SHORTHAND,
            manifests::EMPTY,
        ] {
            serde_json::from_str::<serde_json::Value>(manifest).expect("Manifest should be valid JSON");
        }
        assert!(serde_json::from_str::<serde_json::Value>(manifests::INVALID_JSON).is_err());
    }
}
