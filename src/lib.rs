//! # Tree-sitter Vendor Library
//!
//! This library vendors tree-sitter grammars into a Swift package layout. It
//! reads a JSON manifest of upstream grammar repositories, clones each one,
//! optionally regenerates its parser, and copies or templates the selected
//! files into `Sources/<Target>/`.
//!
//! ## Quick Example
//!
//! ```
//! use tree_sitter_vendor::config;
//!
//! let manifest = config::parse(r#"{
//!     "repositories": [{
//!         "name": "tree-sitter/tree-sitter-json",
//!         "targets": {"baseName": "TreeSitterJSON", "treeSitterFunctionName": "tree_sitter_json"}
//!     }]
//! }"#).unwrap();
//!
//! // The shorthand expands into a sources target and a queries target.
//! let names: Vec<_> = manifest.repositories[0].targets.iter().map(|t| t.name.as_str()).collect();
//! assert_eq!(names, ["TreeSitterJSON", "TreeSitterJSONQueries"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`config`)**: the JSON document, validated and normalized so
//!   that every repository carries an explicit list of targets.
//! - **Fetching (`repository`, `git`)**: fresh clones into a temporary
//!   [`workspace`], with `tree-sitter generate` where requested.
//! - **Materialization (`materialize`, `template`)**: per-file copy or
//!   template rendering into the destination tree.
//! - **Filesystem (`filesystem`)**: the file operations the pipeline needs,
//!   with an in-memory implementation for tests.
//!
//! The [`orchestrator`] ties these together for a whole manifest.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod materialize;
pub mod orchestrator;
pub mod output;
pub mod repository;
pub mod template;
pub mod workspace;

#[cfg(test)]
mod template_proptest;
