//! Typed settings shared by every subcommand, loadable from a TOML file
//! and overridable by whatever flags the CLI was actually invoked with.
//!
//! This is pure data — reading the file named on the command line is the
//! only I/O `Config` itself performs; it does not touch the index or the
//! scanned tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mirrors the common flags shared across all four subcommands.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exclude_paths: Vec<PathBuf>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub start_with: Option<String>,
    #[serde(default)]
    pub start_after: Option<String>,
    #[serde(default)]
    pub relative_to: Option<PathBuf>,
    #[serde(default)]
    pub verbose: u8,
}

impl Config {
    /// Parse a `Config` from a TOML document already in memory.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        toml::from_str(text).map_err(|source| CoreError::Config(source.to_string()))
    }

    /// Load and parse a `Config` from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CoreError::CannotOpenIndex {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Merge CLI-supplied overrides on top of `self`: any field the CLI
    /// actually set (`Some`/non-empty) replaces the file's value; anything
    /// the CLI left at its default is taken from the file untouched. Lists
    /// (`exclude_paths`, `exclude_patterns`) are replaced wholesale, not
    /// concatenated — a CLI invocation that sets `--exclude-path` means
    /// "use exactly this list", not "add to the file's list".
    pub fn merge_cli(mut self, overrides: CliOverrides) -> Self {
        if !overrides.exclude_paths.is_empty() {
            self.exclude_paths = overrides.exclude_paths;
        }
        if !overrides.exclude_patterns.is_empty() {
            self.exclude_patterns = overrides.exclude_patterns;
        }
        if overrides.start_with.is_some() {
            self.start_with = overrides.start_with;
        }
        if overrides.start_after.is_some() {
            self.start_after = overrides.start_after;
        }
        if overrides.relative_to.is_some() {
            self.relative_to = overrides.relative_to;
        }
        if overrides.verbose > 0 {
            self.verbose = overrides.verbose;
        }
        self
    }
}

/// The subset of CLI flags that can override a loaded `Config`. Kept
/// separate from the `clap`-derived argument struct in `cli.rs` so this
/// module has no dependency on the CLI crate.
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub exclude_paths: Vec<PathBuf>,
    pub exclude_patterns: Vec<String>,
    pub start_with: Option<String>,
    pub start_after: Option<String>,
    pub relative_to: Option<PathBuf>,
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_wins_over_file_value() {
        let file_config = Config::from_toml_str(r#"exclude_patterns = ["*.tmp"]"#).unwrap();
        let merged = file_config.merge_cli(CliOverrides {
            exclude_patterns: vec!["*.bak".into()],
            ..Default::default()
        });
        assert_eq!(merged.exclude_patterns, vec!["*.bak".to_string()]);
    }

    #[test]
    fn file_value_survives_when_cli_omits_it() {
        let file_config = Config::from_toml_str(r#"start_with = "archive/2020""#).unwrap();
        let merged = file_config.merge_cli(CliOverrides::default());
        assert_eq!(merged.start_with.as_deref(), Some("archive/2020"));
    }

    #[test]
    fn verbose_zero_from_cli_does_not_clobber_file() {
        let file_config = Config::from_toml_str("verbose = 2").unwrap();
        let merged = file_config.merge_cli(CliOverrides::default());
        assert_eq!(merged.verbose, 2);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config {
            exclude_paths: vec![PathBuf::from("/tmp/skip")],
            verbose: 1,
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
