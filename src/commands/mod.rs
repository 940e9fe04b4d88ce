//! # CLI Command Implementations
//!
//! One module per subcommand of `tree-sitter-vendor`. Each holds an `Args`
//! struct derived with `clap` and an `execute` function that calls into the
//! `tree_sitter_vendor` library.

pub mod completions;
pub mod ls;
pub mod update;
pub mod validate;
