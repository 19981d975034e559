//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// A single malformed line encountered while reading an index file.
///
/// Carries enough context for the caller to log a useful warning; parsing
/// continues with this record skipped rather than aborting the whole load.
#[derive(Debug, Error)]
#[error("{file}:{line}: malformed record: {reason}")]
pub struct RecordParseError {
    pub file: PathBuf,
    pub line: usize,
    pub reason: String,
}

/// Errors that abort a pipeline run outright.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cannot open index file {path}: {source}")]
    CannotOpenIndex {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report output: {0}")]
    OutputSinkFailure(#[source] std::io::Error),

    #[error("cannot create output file {path}: {source}")]
    CannotCreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("indexer failed while walking {path}: {source}")]
    Indexer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
