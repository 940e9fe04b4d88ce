//! # Templates
//!
//! Two kinds of generated files exist in the package layout:
//!
//! - **Variable templates** such as `public.h`, where each `{{NAME}}`
//!   placeholder is replaced by the value of the manifest variable `name`
//!   (keys are upper-cased to form the placeholder).
//! - **The accessor listing** `Query.swift`, whose single `{{SOURCE}}`
//!   insertion point receives one `public static var <ident>FileUrl: URL`
//!   declaration per query file (`*.scm`) in a scanned directory.
//!
//! Template text comes from a [`TemplateStore`]: either the templates compiled
//! into the binary or a directory chosen on the command line.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Extension of the files listed by the accessor template.
pub const QUERY_FILE_EXTENSION: &str = ".scm";

/// Insertion point of the accessor template.
pub const SOURCE_PLACEHOLDER: &str = "{{SOURCE}}";

/// Suffix appended to every accessor identifier.
pub const ACCESSOR_SUFFIX: &str = "FileUrl";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("public.h", include_str!("../templates/public.h")),
    ("Query.swift", include_str!("../templates/Query.swift")),
];

/// Where template text is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateStore {
    /// Templates shipped with the tool.
    #[default]
    Builtin,
    /// `<dir>/<template name>`.
    Directory(PathBuf),
}

impl TemplateStore {
    pub fn builtin() -> Self {
        TemplateStore::Builtin
    }

    pub fn from_dir<P: Into<PathBuf>>(dir: P) -> Self {
        TemplateStore::Directory(dir.into())
    }

    /// Load the text of the named template.
    pub fn load(&self, name: &str) -> Result<String> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Template {
                message: format!("Invalid template name '{}'", name),
                variable: None,
            });
        }

        match self {
            TemplateStore::Builtin => BUILTIN_TEMPLATES
                .iter()
                .find(|(builtin, _)| *builtin == name)
                .map(|(_, text)| text.to_string())
                .ok_or_else(|| Error::Template {
                    message: format!(
                        "Unknown template '{}'; built-in templates are {}",
                        name,
                        builtin_names().join(", ")
                    ),
                    variable: None,
                }),
            TemplateStore::Directory(dir) => {
                let path = dir.join(name);
                std::fs::read_to_string(&path).map_err(|e| Error::Template {
                    message: format!("Failed to load template '{}': {}", path.display(), e),
                    variable: None,
                })
            }
        }
    }
}

/// Names of the templates compiled into the binary.
pub fn builtin_names() -> Vec<&'static str> {
    BUILTIN_TEMPLATES.iter().map(|(name, _)| *name).collect()
}

/// Replace every `{{KEY}}` with its value, `KEY` being the upper-cased
/// variable name.
pub fn render_variables(template: &str, variables: &BTreeMap<String, String>) -> String {
    variables
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            let placeholder = format!("{{{{{}}}}}", name.to_uppercase());
            text.replace(&placeholder, value)
        })
}

/// Placeholders still present in rendered text, in order of appearance.
pub fn unresolved_placeholders(text: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(r"\{\{([A-Z0-9_]+)\}\}").map_err(|e| Error::Template {
        message: e.to_string(),
        variable: None,
    })?;
    Ok(pattern
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect())
}

/// Identifier for a query file stem: split on `-`, lower-case the first
/// segment, capitalize the rest, concatenate.
///
/// `json-schema` becomes `jsonSchema`.
pub fn accessor_identifier(stem: &str) -> String {
    stem.split('-')
        .enumerate()
        .map(|(index, segment)| {
            if index == 0 {
                return segment.to_lowercase();
            }
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Swift declaration resolving a query file's bundled URL.
pub fn accessor_declaration(stem: &str) -> String {
    format!(
        "    public static var {}{}: URL {{\n        return url(named: \"{}\")\n    }}",
        accessor_identifier(stem),
        ACCESSOR_SUFFIX,
        stem
    )
}

/// Query file stems among `filenames`, in the order given.
pub fn query_file_stems(filenames: &[String]) -> Vec<&str> {
    filenames
        .iter()
        .filter_map(|name| name.strip_suffix(QUERY_FILE_EXTENSION))
        .filter(|stem| !stem.is_empty())
        .collect()
}

/// Fill the accessor template with one declaration per query file.
pub fn render_accessor_listing(template: &str, filenames: &[String]) -> Result<String> {
    if !template.contains(SOURCE_PLACEHOLDER) {
        return Err(Error::Template {
            message: "Accessor template has no insertion point".to_string(),
            variable: Some("SOURCE".to_string()),
        });
    }

    let declarations: Vec<String> = query_file_stems(filenames)
        .into_iter()
        .map(accessor_declaration)
        .collect();

    Ok(template.replacen(SOURCE_PLACEHOLDER, &declarations.join("\n\n"), 1))
}
