//! # Terminal Output
//!
//! Status lines printed by the CLI start with a marker: an emoji when the
//! terminal takes colour, a bracketed tag otherwise.
//!
//! The `--color` flag decides first (`always`, `never`, `auto`). In `auto`
//! mode the environment is consulted:
//! - `NO_COLOR` set to anything disables colour (https://no-color.org/)
//! - `CLICOLOR=0` disables colour
//! - `CLICOLOR_FORCE` set to a non-zero value enables it even without a TTY
//! - `TERM=dumb` disables colour
//!
//! Otherwise `console` decides from the attached stdout.
//!
//! ```rust,ignore
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Cloning...", emoji(&out, "📦", "[FETCH]"));
//! ```

use std::env;

/// Whether decorated output is wanted.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag value against the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::terminal_supports_color(),
        };
        Self { use_color }
    }

    fn terminal_supports_color() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0") {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// `emoji_str` when colour is on, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// A count with its noun, e.g. `1 target`, `3 targets`.
pub fn counted(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_flag_always_and_never() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
        assert!(!OutputConfig::from_env_and_flag("never").use_color);
    }

    #[test]
    fn test_emoji_marker() {
        assert_eq!(emoji(&OutputConfig::with_color(), "✅", "[OK]"), "✅");
        assert_eq!(emoji(&OutputConfig::without_color(), "✅", "[OK]"), "[OK]");
    }

    #[test]
    fn test_counted() {
        assert_eq!(counted(0, "file", "files"), "0 files");
        assert_eq!(counted(1, "repository", "repositories"), "1 repository");
        assert_eq!(counted(2, "repository", "repositories"), "2 repositories");
    }
}
