use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dupe_sleuth::cli::{Cli, Command};
use dupe_sleuth::collapse::collapse_folder_groups;
use dupe_sleuth::config::Config;
use dupe_sleuth::error::CoreError;
use dupe_sleuth::grouping::group_duplicate_files;
use dupe_sleuth::index::load_index_files;
use dupe_sleuth::indexer::{self, WalkOptions};
use dupe_sleuth::pairs::{expand_pairs, merge_pairs};
use dupe_sleuth::report;
use dupe_sleuth::transpose::transpose_all;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(Cli::tracing_filter(cli.verbose)))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CoreError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = config.merge_cli(cli.cli_overrides());
    let walk_opts = WalkOptions::from(&config);

    match cli.command {
        Command::CreateIndex { root, output, errors } => {
            let mut out = BufWriter::new(open_output(&output)?);
            let mut error_file = errors.as_ref().map(open_output).transpose()?.map(BufWriter::new);
            let error_sink: Option<&mut dyn Write> = error_file.as_mut().map(|w| w as &mut dyn Write);
            indexer::create_index(&root, &mut out, error_sink, &walk_opts)?;
            out.flush().map_err(CoreError::OutputSinkFailure)
        }
        Command::CollectFolders { root, output, fast } => {
            let mut opts = walk_opts;
            opts.fast = fast;
            let mut out = BufWriter::new(open_output(&output)?);
            indexer::collect_folders(&root, &mut out, &opts)?;
            out.flush().map_err(CoreError::OutputSinkFailure)
        }
        Command::DuplicateFiles { index, json } => {
            let records = load_index_files(&index)?;
            let groups = group_duplicate_files(records);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                return write_json_or_refuse(|w| report::write_duplicate_files_json(&groups, w), &mut out);
            }
            report::write_duplicate_files(&groups, &mut out).map_err(CoreError::OutputSinkFailure)
        }
        Command::SimilarFolders { index, json } => {
            let records = load_index_files(&index)?;
            let groups = group_duplicate_files(records);
            let transposed = transpose_all(&groups);
            let folder_groups = collapse_folder_groups(transposed);
            let proto_pairs = expand_pairs(&folder_groups);
            let pairs = merge_pairs(proto_pairs);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                return write_json_or_refuse(|w| report::write_folder_pairs_json(&pairs, w), &mut out);
            }
            report::write_folder_pairs(&pairs, &mut out).map_err(CoreError::OutputSinkFailure)
        }
    }
}

#[cfg(feature = "json")]
fn write_json_or_refuse(f: impl FnOnce(&mut dyn Write) -> io::Result<()>, out: &mut dyn Write) -> Result<(), CoreError> {
    f(out).map_err(CoreError::OutputSinkFailure)
}

#[cfg(not(feature = "json"))]
fn write_json_or_refuse(_f: impl FnOnce(&mut dyn Write) -> io::Result<()>, _out: &mut dyn Write) -> Result<(), CoreError> {
    Err(CoreError::Config("this binary was compiled without JSON support".to_string()))
}

fn open_output(path: &PathBuf) -> Result<File, CoreError> {
    File::create(path).map_err(|source| CoreError::CannotCreateOutput { path: path.clone(), source })
}
