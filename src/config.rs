//! # Manifest Schema and Loading
//!
//! This module defines the data structures that describe which upstream
//! repositories are vendored and how their files map onto the package layout,
//! as well as the logic for loading them from the JSON manifest
//! (`config.json`).
//!
//! ## Key Components
//!
//! - **`Manifest`**: The normalized manifest, a list of `Repository` entries.
//! - **`Repository`**: One upstream project, the targets it feeds and whether
//!   its parser sources must be regenerated after cloning.
//! - **`Target`**: A named output library assembled from `FileEntry` items.
//! - **`FileEntry`**: Either a copy from the checkout or a rendered template.
//!
//! ## Loading
//!
//! `parse` reads the raw document and validates every repository up front.
//! A repository may spell its targets out explicitly or use the shorthand
//! `{ "baseName": ..., "treeSitterFunctionName": ... }`, which `parse` expands
//! into the standard sources + queries pair via `standard_targets`. The
//! returned `Manifest` never contains shorthand entries, so the rest of the
//! pipeline only ever sees explicit file mappings.
//!
//! Any malformed entry fails the whole load with `Error::ConfigParse`. Nothing
//! is fetched for a manifest that does not load.

use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path};

/// Manifest read when no path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";

/// Default destination root.
pub const DEFAULT_OUTPUT_DIR: &str = "Sources";

/// Template rendered by scanning a directory of query files.
pub const ACCESSOR_TEMPLATE: &str = "Query.swift";

/// Template for the public C header of a parser target.
pub const HEADER_TEMPLATE: &str = "public.h";

/// Suffix appended to `baseName` for the queries target of a shorthand entry.
pub const QUERIES_TARGET_SUFFIX: &str = "Queries";

/// The normalized manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    /// Repositories in declaration order.
    pub repositories: Vec<Repository>,
}

impl Manifest {
    /// Total number of targets across all repositories.
    pub fn target_count(&self) -> usize {
        self.repositories.iter().map(|r| r.targets.len()).sum()
    }

    /// Total number of file entries across all targets.
    pub fn file_count(&self) -> usize {
        self.repositories
            .iter()
            .flat_map(|r| &r.targets)
            .map(|t| t.files.len())
            .sum()
    }
}

/// An upstream repository and the targets it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// `owner/repo` identifier.
    pub name: String,
    /// Run the upstream parser generator after cloning.
    pub run_generate: bool,
    /// Targets in declaration order.
    pub targets: Vec<Target>,
}

impl Repository {
    /// Name of the checkout directory inside the workspace.
    pub fn directory_name(&self) -> &str {
        repository_directory_name(&self.name)
    }
}

/// A named destination library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Directory name under the output root.
    pub name: String,
    /// Files in declaration order.
    pub files: Vec<FileEntry>,
}

/// A single file mapping inside a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Copy a file or directory out of the checkout.
    Copy {
        /// Destination, relative to the target directory.
        file_path: String,
        /// Source, relative to the checkout root.
        source_file_path: String,
    },
    /// Render a named template.
    Template {
        /// Destination, relative to the target directory.
        file_path: String,
        /// Template name, e.g. `public.h`.
        template: String,
        /// What gets substituted into the template.
        fill: TemplateFill,
    },
}

impl FileEntry {
    /// Destination path relative to the target directory.
    pub fn file_path(&self) -> &str {
        match self {
            FileEntry::Copy { file_path, .. } | FileEntry::Template { file_path, .. } => file_path,
        }
    }
}

/// Input for a template render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateFill {
    /// Replace `{{KEY}}` with the value for each key.
    Variables(BTreeMap<String, String>),
    /// Generate one accessor per query file found in this directory, which is
    /// resolved relative to the target directory.
    ScannedDirectory(String),
}

/// Raw manifest document.
#[derive(Debug, Deserialize)]
struct RawManifest {
    repositories: Vec<Value>,
}

/// Raw repository entry. `targets` is classified by hand so that the error
/// can quote the whole entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepository {
    name: String,
    #[serde(default)]
    run_tree_sitter_generate: bool,
    #[serde(default)]
    targets: Value,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    name: String,
    files: Vec<RawFile>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scanned_directory_path: Option<String>,
}

/// The two accepted shapes of `targets`.
enum TargetsSpec {
    Explicit(Vec<Value>),
    Standard {
        base_name: String,
        function_name: String,
    },
}

impl TargetsSpec {
    fn classify(targets: &Value) -> Option<Self> {
        match targets {
            Value::Array(items) => Some(TargetsSpec::Explicit(items.clone())),
            Value::Object(map) => {
                let base_name = map.get("baseName").and_then(Value::as_str)?;
                let function_name = map
                    .get("treeSitterFunctionName")
                    .or_else(|| map.get("generatorFunctionName"))
                    .and_then(Value::as_str)?;
                Some(TargetsSpec::Standard {
                    base_name: base_name.to_string(),
                    function_name: function_name.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Parses a JSON manifest and normalizes it.
pub fn parse(json: &str) -> Result<Manifest> {
    let raw: RawManifest = serde_json::from_str(json)?;

    let mut repositories = Vec::with_capacity(raw.repositories.len());
    for value in &raw.repositories {
        repositories.push(normalize_repository(value)?);
    }

    let manifest = Manifest { repositories };
    warn_duplicate_destinations(&manifest);
    Ok(manifest)
}

/// Reads and parses the manifest at `path`.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Expands a shorthand entry into the standard sources + queries targets.
pub fn standard_targets(base_name: &str, function_name: &str) -> Vec<Target> {
    let copy = |path: &str| FileEntry::Copy {
        file_path: path.to_string(),
        source_file_path: path.to_string(),
    };

    let mut variables = BTreeMap::new();
    variables.insert("name".to_string(), function_name.to_string());

    vec![
        Target {
            name: base_name.to_string(),
            files: vec![
                copy("src/parser.c"),
                copy("src/scanner.cc"),
                copy("src/tree_sitter"),
                FileEntry::Template {
                    file_path: "include/public.h".to_string(),
                    template: HEADER_TEMPLATE.to_string(),
                    fill: TemplateFill::Variables(variables),
                },
            ],
        },
        Target {
            name: format!("{}{}", base_name, QUERIES_TARGET_SUFFIX),
            files: vec![
                copy("queries"),
                FileEntry::Template {
                    file_path: ACCESSOR_TEMPLATE.to_string(),
                    template: ACCESSOR_TEMPLATE.to_string(),
                    fill: TemplateFill::ScannedDirectory("queries".to_string()),
                },
            ],
        },
    ]
}

/// Last `/`-separated component of a repository identifier.
pub fn repository_directory_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn normalize_repository(value: &Value) -> Result<Repository> {
    let raw: RawRepository =
        serde_json::from_value(value.clone()).map_err(|e| invalid_repository(value, Some(e.to_string())))?;

    let directory = repository_directory_name(&raw.name);
    if directory.is_empty() || directory == "." || directory == ".." {
        return Err(invalid_repository(
            value,
            Some("`name` must end in a repository name, e.g. `owner/repo`".to_string()),
        ));
    }

    let targets = match TargetsSpec::classify(&raw.targets) {
        Some(TargetsSpec::Standard {
            base_name,
            function_name,
        }) => {
            validate_target_name(&raw.name, &base_name)?;
            standard_targets(&base_name, &function_name)
        }
        Some(TargetsSpec::Explicit(items)) => {
            let mut targets = Vec::with_capacity(items.len());
            for item in items {
                let target: RawTarget = serde_json::from_value(item).map_err(|e| Error::ConfigParse {
                    message: format!("Invalid target in repository '{}': {}", raw.name, e),
                    hint: Some("each target needs a `name` and a `files` array".to_string()),
                })?;
                targets.push(normalize_target(&raw.name, target)?);
            }
            targets
        }
        None => {
            return Err(invalid_repository(
                value,
                Some(
                    "`targets` must be an array of targets or an object with \
                     `baseName` and `treeSitterFunctionName`"
                        .to_string(),
                ),
            ))
        }
    };

    Ok(Repository {
        name: raw.name,
        run_generate: raw.run_tree_sitter_generate,
        targets,
    })
}

fn normalize_target(repository: &str, raw: RawTarget) -> Result<Target> {
    validate_target_name(repository, &raw.name)?;

    let mut files = Vec::with_capacity(raw.files.len());
    for file in raw.files {
        files.push(normalize_file(repository, &raw.name, file)?);
    }

    Ok(Target {
        name: raw.name,
        files,
    })
}

fn normalize_file(repository: &str, target: &str, raw: RawFile) -> Result<FileEntry> {
    let fail = |raw: &RawFile, reason: &str| Error::ConfigParse {
        message: format!(
            "Invalid file in target '{}' of repository '{}': {}: {}",
            target,
            repository,
            reason,
            serde_json::to_string(raw).unwrap_or_default()
        ),
        hint: None,
    };

    let Some(file_path) = raw.file_path.as_deref() else {
        return Err(fail(&raw, "missing filePath"));
    };
    if let Err(reason) = validate_relative(file_path) {
        return Err(fail(&raw, &format!("filePath {}", reason)));
    }

    match (&raw.source_file_path, &raw.template) {
        (Some(_), Some(_)) => Err(fail(&raw, "sourceFilePath and template are mutually exclusive")),
        (None, None) => Err(fail(&raw, "missing sourceFilePath")),
        (Some(source), None) => {
            if raw.variables.is_some() || raw.scanned_directory_path.is_some() {
                return Err(fail(
                    &raw,
                    "variables and scannedDirectoryPath only apply to templates",
                ));
            }
            if let Err(reason) = validate_relative(source) {
                return Err(fail(&raw, &format!("sourceFilePath {}", reason)));
            }
            Ok(FileEntry::Copy {
                file_path: file_path.to_string(),
                source_file_path: source.clone(),
            })
        }
        (None, Some(template)) => {
            let fill = if template == ACCESSOR_TEMPLATE {
                if raw.variables.is_some() {
                    return Err(fail(&raw, "Query.swift template does not take variables"));
                }
                let Some(scanned) = raw.scanned_directory_path.as_deref() else {
                    return Err(fail(&raw, "Query.swift template must specify scannedDirectoryPath"));
                };
                if let Err(reason) = validate_relative(scanned) {
                    return Err(fail(&raw, &format!("scannedDirectoryPath {}", reason)));
                }
                TemplateFill::ScannedDirectory(scanned.to_string())
            } else {
                if raw.scanned_directory_path.is_some() {
                    return Err(fail(
                        &raw,
                        "scannedDirectoryPath only applies to the Query.swift template",
                    ));
                }
                TemplateFill::Variables(raw.variables.clone().unwrap_or_default())
            };
            Ok(FileEntry::Template {
                file_path: file_path.to_string(),
                template: template.clone(),
                fill,
            })
        }
    }
}

/// Paths in the manifest must stay inside the directory they are joined to.
fn validate_relative(path: &str) -> std::result::Result<(), &'static str> {
    if path.is_empty() {
        return Err("is empty");
    }
    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err("must be a relative path without `..`");
    }
    if Path::new(path)
        .components()
        .all(|c| matches!(c, Component::CurDir))
    {
        return Err("must name a file or directory, not `.`");
    }
    Ok(())
}

fn validate_target_name(repository: &str, name: &str) -> Result<()> {
    let single_component = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if single_component {
        Ok(())
    } else {
        Err(Error::ConfigParse {
            message: format!(
                "Invalid target name '{}' in repository '{}'",
                name, repository
            ),
            hint: Some("target names become a single directory under the output root".to_string()),
        })
    }
}

fn invalid_repository(value: &Value, hint: Option<String>) -> Error {
    Error::ConfigParse {
        message: format!(
            "Invalid configuration for repository: {}",
            serde_json::to_string(value).unwrap_or_default()
        ),
        hint,
    }
}

fn warn_duplicate_destinations(manifest: &Manifest) {
    let mut seen: HashMap<(&str, &str), &str> = HashMap::new();
    for repository in &manifest.repositories {
        for target in &repository.targets {
            for file in &target.files {
                let key = (target.name.as_str(), file.file_path());
                if let Some(previous) = seen.insert(key, &repository.name) {
                    warn!(
                        "{}/{} is written by both {} and {}; the later one wins",
                        target.name,
                        file.file_path(),
                        previous,
                        repository.name
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_config_error(json: &str, needle: &str) {
        match parse(json) {
            Err(Error::ConfigParse { message, .. }) => {
                assert!(
                    message.contains(needle),
                    "expected '{}' in '{}'",
                    needle,
                    message
                );
            }
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_shorthand_expands_to_standard_targets() {
        let json = r#"{
            "repositories": [{
                "name": "tree-sitter/tree-sitter-bash",
                "targets": { "baseName": "TreeSitterBash", "treeSitterFunctionName": "tree_sitter_bash" }
            }]
        }"#;

        let manifest = parse(json).unwrap();
        assert_eq!(manifest.repositories.len(), 1);
        let repository = &manifest.repositories[0];
        assert!(!repository.run_generate);
        assert_eq!(repository.directory_name(), "tree-sitter-bash");
        assert_eq!(
            repository.targets,
            standard_targets("TreeSitterBash", "tree_sitter_bash")
        );
    }

    #[test]
    fn test_standard_targets_layout() {
        let targets = standard_targets("X", "f");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "X");
        assert_eq!(targets[1].name, "XQueries");

        let paths: Vec<&str> = targets[0].files.iter().map(FileEntry::file_path).collect();
        assert_eq!(
            paths,
            vec!["src/parser.c", "src/scanner.cc", "src/tree_sitter", "include/public.h"]
        );

        match &targets[0].files[3] {
            FileEntry::Template {
                template,
                fill: TemplateFill::Variables(vars),
                ..
            } => {
                assert_eq!(template, HEADER_TEMPLATE);
                assert_eq!(vars.get("name").map(String::as_str), Some("f"));
            }
            other => panic!("Expected header template, got {:?}", other),
        }

        match &targets[1].files[1] {
            FileEntry::Template {
                file_path,
                template,
                fill,
            } => {
                assert_eq!(file_path, "Query.swift");
                assert_eq!(template, ACCESSOR_TEMPLATE);
                assert_eq!(fill, &TemplateFill::ScannedDirectory("queries".to_string()));
            }
            other => panic!("Expected accessor template, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_generator_function_name_alias() {
        let json = r#"{"repositories": [{
            "name": "owner/repo",
            "targets": { "baseName": "Foo", "generatorFunctionName": "tree_sitter_foo" }
        }]}"#;
        let manifest = parse(json).unwrap();
        assert_eq!(manifest.repositories[0].targets, standard_targets("Foo", "tree_sitter_foo"));
    }

    #[test]
    fn test_parse_explicit_targets() {
        let json = r#"{"repositories": [{
            "name": "ikatyang/tree-sitter-markdown",
            "runTreeSitterGenerate": true,
            "targets": [{
                "name": "TreeSitterMarkdown",
                "files": [
                    { "filePath": "src/parser.c", "sourceFilePath": "src/parser.c" },
                    { "filePath": "include/public.h", "template": "public.h",
                      "variables": { "name": "tree_sitter_markdown" } },
                    { "filePath": "README.txt", "template": "notice.txt" }
                ]
            }]
        }]}"#;

        let manifest = parse(json).unwrap();
        let repository = &manifest.repositories[0];
        assert!(repository.run_generate);
        assert_eq!(repository.targets.len(), 1);

        let files = &repository.targets[0].files;
        assert_eq!(
            files[0],
            FileEntry::Copy {
                file_path: "src/parser.c".to_string(),
                source_file_path: "src/parser.c".to_string(),
            }
        );
        match &files[2] {
            FileEntry::Template {
                fill: TemplateFill::Variables(vars),
                ..
            } => assert!(vars.is_empty()),
            other => panic!("Expected template without variables, got {:?}", other),
        }
        assert_eq!(manifest.target_count(), 1);
        assert_eq!(manifest.file_count(), 3);
    }

    #[test]
    fn test_parse_shorthand_missing_function_name() {
        let json = r#"{"repositories": [{"name": "owner/repo", "targets": {"baseName": "Foo"}}]}"#;
        assert_config_error(json, "Invalid configuration for repository:");
        assert_config_error(json, "\"baseName\":\"Foo\"");
    }

    #[test]
    fn test_parse_missing_targets() {
        assert_config_error(
            r#"{"repositories": [{"name": "owner/repo"}]}"#,
            "Invalid configuration for repository:",
        );
        assert_config_error(
            r#"{"repositories": [{"name": "owner/repo", "targets": "Foo"}]}"#,
            "owner/repo",
        );
    }

    #[test]
    fn test_parse_positional_pair_is_not_shorthand() {
        // An array is always an explicit target list.
        assert_config_error(
            r#"{"repositories": [{"name": "owner/repo", "targets": ["Foo", "tree_sitter_foo"]}]}"#,
            "Invalid target in repository 'owner/repo'",
        );
    }

    #[test]
    fn test_parse_rejects_mixed_copy_and_template() {
        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": "a", "sourceFilePath": "a", "template": "public.h"}
        ]}]}]}"#;
        assert_config_error(json, "mutually exclusive");
    }

    #[test]
    fn test_parse_rejects_missing_source() {
        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": "a"}
        ]}]}]}"#;
        assert_config_error(json, "missing sourceFilePath");
    }

    #[test]
    fn test_parse_rejects_accessor_template_without_scanned_directory() {
        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": "Query.swift", "template": "Query.swift"}
        ]}]}]}"#;
        assert_config_error(json, "must specify scannedDirectoryPath");
    }

    #[test]
    fn test_parse_rejects_scanned_directory_on_plain_template() {
        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": "include/public.h", "template": "public.h", "scannedDirectoryPath": "queries"}
        ]}]}]}"#;
        assert_config_error(json, "only applies to the Query.swift template");
    }

    #[test]
    fn test_parse_rejects_escaping_paths() {
        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": "../outside.c", "sourceFilePath": "src/parser.c"}
        ]}]}]}"#;
        assert_config_error(json, "filePath must be a relative path");

        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": "parser.c", "sourceFilePath": "/etc/passwd"}
        ]}]}]}"#;
        assert_config_error(json, "sourceFilePath must be a relative path");

        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": ".", "sourceFilePath": "src"}
        ]}]}]}"#;
        assert_config_error(json, "filePath must name a file or directory");

        let json = r#"{"repositories": [{"name": "o/r", "targets": [{"name": "T", "files": [
            {"filePath": "src", "sourceFilePath": "./"}
        ]}]}]}"#;
        assert_config_error(json, "sourceFilePath must name a file or directory");
    }

    #[test]
    fn test_parse_rejects_bad_target_name() {
        let json = r#"{"repositories": [{"name": "o/r", "targets": {"baseName": "a/b", "treeSitterFunctionName": "f"}}]}"#;
        assert_config_error(json, "Invalid target name 'a/b'");
    }

    #[test]
    fn test_parse_rejects_repository_name_without_repo_component() {
        assert_config_error(
            r#"{"repositories": [{"name": "owner/", "targets": {"baseName": "A", "treeSitterFunctionName": "f"}}]}"#,
            "Invalid configuration for repository:",
        );
    }

    #[test]
    fn test_parse_fails_before_later_repositories() {
        let json = r#"{"repositories": [
            {"name": "o/good", "targets": {"baseName": "Good", "treeSitterFunctionName": "f"}},
            {"name": "o/bad", "targets": {"baseName": "Bad"}}
        ]}"#;
        assert!(parse(json).is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse("{\"repositories\": [");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_empty_repositories() {
        let manifest = parse(r#"{"repositories": []}"#).unwrap();
        assert!(manifest.repositories.is_empty());
    }

    #[test]
    fn test_from_file_nonexistent() {
        assert!(from_file("nonexistent_manifest.json").is_err());
    }

    #[test]
    fn test_repository_directory_name() {
        assert_eq!(repository_directory_name("owner/repo"), "repo");
        assert_eq!(repository_directory_name("repo"), "repo");
        assert_eq!(repository_directory_name("a/b/c"), "c");
    }

    #[test]
    fn test_bundled_manifest_loads() {
        let manifest = parse(include_str!("../config.json")).unwrap();
        assert!(!manifest.repositories.is_empty());
        for repository in &manifest.repositories {
            assert!(!repository.targets.is_empty(), "{} has no targets", repository.name);
        }
    }

    #[test]
    fn test_duplicate_destinations_are_warned() {
        testing_logger::setup();
        let json = r#"{"repositories": [
            {"name": "o/one", "targets": {"baseName": "Same", "treeSitterFunctionName": "f"}},
            {"name": "o/two", "targets": {"baseName": "Same", "treeSitterFunctionName": "g"}}
        ]}"#;
        parse(json).unwrap();
        testing_logger::validate(|logs| {
            assert!(logs
                .iter()
                .any(|l| l.level == log::Level::Warn && l.body.contains("o/one and o/two")));
        });
    }
}
