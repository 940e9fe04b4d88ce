use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Default prefix for turning an `owner/repo` identifier into a clone URL.
pub const DEFAULT_REMOTE_BASE: &str = "git@github.com:";

/// Build the clone URL for a repository identifier
///
/// `remote_base` is prepended verbatim, so both `git@github.com:` and
/// `https://github.com/` work.
pub fn remote_url(remote_base: &str, name: &str) -> String {
    format!("{}{}.git", remote_base, name)
}

/// Clone the default branch of `url` into `target_dir`
///
/// `target_dir` must be empty or absent. This uses the system git command,
/// which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Any authentication configured in ~/.gitconfig
pub fn clone_default_branch(url: &str, target_dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["clone", "--quiet", url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            message: e.to_string(),
            hint: Some("Make sure git is installed and on PATH".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide helpful error message for common auth failures
        let hint = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            Some(
                "The default remote uses SSH; add a key to ssh-agent or pass \
                 --remote-base https://github.com/"
                    .to_string(),
            )
        } else {
            None
        };

        return Err(Error::GitClone {
            url: url.to_string(),
            message: stderr.trim().to_string(),
            hint,
        });
    }

    Ok(())
}

/// Run `program args...` inside `dir`, failing on a non-zero exit
pub fn run_in(dir: &Path, program: &str, args: &[&str]) -> Result<()> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::Generate {
            command: command.clone(),
            dir: dir.display().to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::Generate {
            command,
            dir: dir.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Install the grammar's npm dependencies and regenerate its parser sources
pub fn tree_sitter_generate(dir: &Path) -> Result<()> {
    run_in(dir, "npm", &["install"])?;
    run_in(dir, "tree-sitter", &["generate"])
}
