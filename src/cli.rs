//! The `clap`-derived argument surface: four subcommands plus the common
//! flags, wired to the core pipeline and the indexer in `main.rs`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CliOverrides;

#[derive(Parser, Debug)]
#[command(name = "dupe-sleuth", version, about = "Finds identical files and similar folders from a size+hash index of a filesystem tree.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Load shared settings from a TOML file; CLI flags below still win.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity 0 (errors only) through 3 (trace).
    #[arg(long, global = true, default_value_t = 0)]
    pub verbose: u8,

    #[arg(long = "exclude-path", global = true)]
    pub exclude_path: Vec<PathBuf>,

    #[arg(long = "exclude-pattern", global = true)]
    pub exclude_pattern: Vec<String>,

    #[arg(long = "start-with", global = true)]
    pub start_with: Option<String>,

    #[arg(long = "start-after", global = true)]
    pub start_after: Option<String>,

    #[arg(long = "relative-to", global = true)]
    pub relative_to: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk a directory tree and write a size+hash index.
    #[command(name = "createIndex", alias = "ci")]
    CreateIndex {
        root: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Optional file to append per-file walk errors to.
        #[arg(long)]
        errors: Option<PathBuf>,
    },
    /// Walk a directory tree and write one folder-collection line per
    /// directory.
    #[command(name = "collectFolders", alias = "cf")]
    CollectFolders {
        root: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Skip the per-file readability probe; `num_readable` is always -1.
        #[arg(long)]
        fast: bool,
    },
    /// List every duplicate-file group in one or more index files.
    #[command(name = "duplicateFiles", alias = "df")]
    DuplicateFiles {
        index: Vec<PathBuf>,
        /// Emit JSON instead of the plain-text report (requires the `json`
        /// feature).
        #[arg(long)]
        json: bool,
    },
    /// List similar-folder pairs and the files they share.
    #[command(name = "similarFolders", alias = "sf")]
    SimilarFolders {
        index: Vec<PathBuf>,
        /// Emit JSON instead of the plain-text report (requires the `json`
        /// feature).
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// The subset of flags a loaded [`crate::config::Config`] can be
    /// overridden by, lifted out of the full parsed arguments.
    pub fn cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            exclude_paths: self.exclude_path.clone(),
            exclude_patterns: self.exclude_pattern.clone(),
            start_with: self.start_with.clone(),
            start_after: self.start_after.clone(),
            relative_to: self.relative_to.clone(),
            verbose: self.verbose,
        }
    }

    /// Map `--verbose 0..3` onto a `tracing` level filter.
    pub fn tracing_filter(verbose: u8) -> &'static str {
        match verbose {
            0 => "error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
