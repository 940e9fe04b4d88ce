//! # Error Handling
//!
//! This module defines the centralized error type for the vendoring tool. It
//! uses the `thiserror` library to create a single `Error` enum covering every
//! way a run can fail, with messages that name the offending repository, path
//! or template.
//!
//! ## Taxonomy
//!
//! - **Configuration errors** (`ConfigParse`, `Json`): the manifest is
//!   malformed. These are raised while loading, before anything is fetched.
//! - **Fetch errors** (`GitClone`, `Generate`): cloning an upstream
//!   repository or running its parser generator failed.
//! - **Materialization errors** (`Materialize`, `Template`, `Filesystem`,
//!   `Io`): writing the destination tree failed.
//!
//! Every error is fatal to the run. There is no retry policy.

use thiserror::Error;

/// Main error type for vendoring operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest is malformed.
    ///
    /// Includes the specific issue and optionally a hint about how to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// Cloning an upstream repository failed.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// The upstream parser generator failed inside a checkout.
    #[error("Generation failed in {dir}: {command} - {stderr}")]
    Generate {
        command: String,
        dir: String,
        stderr: String,
    },

    /// Copying or writing a destination file failed.
    #[error("Materialization error at {path}: {message}")]
    Materialize { path: String, message: String },

    /// Loading or rendering a template failed.
    ///
    /// May include the placeholder involved when applicable.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The placeholder that caused the error, if applicable
        variable: Option<String>,
    },

    /// An error from a `FileSystem` implementation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON syntax error in the manifest, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error was raised while loading the manifest.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::ConfigParse { .. } | Error::Json(_))
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
