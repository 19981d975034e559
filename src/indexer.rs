//! The filesystem walker backing the CLI's `createIndex` and
//! `collectFolders` subcommands. Deliberately not imported by
//! `record`/`grouping`/`tree`/`stats` — the core pipeline only ever sees the
//! index files this module produces, via [`crate::index::load_index_files`].

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use sha1::{Digest, Sha1};
use tracing::warn;

use crate::config::Config;
use crate::error::CoreError;
use crate::record::SIZE_WIDTH;

/// Options shared by `create_index` and `collect_folders`, distilled from
/// [`Config`]'s CLI-facing fields into the shape the walk itself needs.
#[derive(Clone, Debug, Default)]
pub struct WalkOptions {
    pub relative_to: Option<PathBuf>,
    pub exclude_paths: Vec<PathBuf>,
    pub exclude_patterns: Vec<String>,
    pub start_with: Option<String>,
    pub start_after: Option<String>,
    /// `collect_folders`' "fast mode": skip the per-file readability probe
    /// and report `num_readable = -1`.
    pub fast: bool,
}

impl From<&Config> for WalkOptions {
    fn from(config: &Config) -> Self {
        WalkOptions {
            relative_to: config.relative_to.clone(),
            exclude_paths: config.exclude_paths.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
            start_with: config.start_with.clone(),
            start_after: config.start_after.clone(),
            fast: false,
        }
    }
}

/// A minimal `*`-wildcard glob, for exclude-pattern matching against a bare
/// filename — not worth a dedicated crate for this alone.
fn glob_match(pattern: &str, text: &str) -> bool {
    fn inner(pattern: &[u8], text: &[u8]) -> bool {
        match pattern.first() {
            None => text.is_empty(),
            Some(b'*') => {
                (0..=text.len()).any(|i| inner(&pattern[1..], &text[i..]))
            }
            Some(&p) => text.first().is_some_and(|&t| t == p) && inner(&pattern[1..], &text[1..]),
        }
    }
    inner(pattern.as_bytes(), text.as_bytes())
}

fn is_excluded(path: &Path, opts: &WalkOptions) -> bool {
    if opts.exclude_paths.iter().any(|excluded| path == excluded) {
        return true;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    opts.exclude_patterns.iter().any(|pattern| glob_match(pattern, name))
}

/// `/`-joined relative path, platform-independent, matching the format
/// [`crate::record::Record`] parses back.
fn relative_path_string(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn within_start_bounds(relative: &str, opts: &WalkOptions) -> bool {
    if let Some(start_with) = &opts.start_with {
        if relative < start_with.as_str() {
            return false;
        }
    }
    if let Some(start_after) = &opts.start_after {
        if relative <= start_after.as_str() {
            return false;
        }
    }
    true
}

fn sha1_hex(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

fn mtime_seconds(metadata: &fs::Metadata) -> f64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Depth-first walk of `root`, directories before files at each level (the
/// same traversal sense the Folder Tree uses), skipping symlinks entirely
/// rather than resolving them. Driven by an explicit stack rather than
/// recursion, per the crate-wide avoid-recursive-descent rule.
fn walk(root: &Path, opts: &WalkOptions, mut visit_dir: impl FnMut(&Path), mut visit_file: impl FnMut(&Path, &fs::Metadata)) {
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                warn!(path = %dir.display(), error = %source, "cannot read directory, skipping");
                continue;
            }
        };
        let mut children: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(source) => {
                    warn!(path = %dir.display(), error = %source, "cannot read directory entry, skipping");
                    continue;
                }
            };
            children.push(entry.path());
        }
        children.sort();

        for path in children {
            if is_excluded(&path, opts) {
                continue;
            }
            let metadata = match fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "cannot stat entry, skipping");
                    continue;
                }
            };
            if metadata.file_type().is_symlink() {
                continue;
            }
            if metadata.is_dir() {
                visit_dir(&path);
                stack.push(path);
            } else if metadata.is_file() {
                visit_file(&path, &metadata);
            }
        }
    }
}

/// Walk `root`, writing one index line per eligible regular file to `out`.
/// Per-file I/O errors (`PermissionDenied`, `NotFound`) are logged with
/// `tracing::warn!` and, if `errors` is given, also appended there as a
/// `path\treason` line; neither aborts the walk.
pub fn create_index(root: &Path, out: &mut dyn Write, mut errors: Option<&mut dyn Write>, opts: &WalkOptions) -> Result<(), CoreError> {
    let base = opts.relative_to.clone().unwrap_or_else(|| root.to_path_buf());
    let mut io_err: Option<io::Error> = None;

    walk(
        root,
        opts,
        |_dir| {},
        |path, metadata| {
            if io_err.is_some() {
                return;
            }
            let relative = relative_path_string(path, &base);
            if !within_start_bounds(&relative, opts) {
                return;
            }
            let hash = match sha1_hex(path) {
                Ok(hash) => hash,
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "cannot hash file, skipping");
                    if let Some(errors) = errors.as_deref_mut() {
                        let _ = writeln!(errors, "{}\t{}", path.display(), source);
                    }
                    return;
                }
            };
            let line = format!(
                "{:>width$}\t{:10.4}\t{}\t{}",
                metadata.len(),
                mtime_seconds(metadata),
                hash,
                relative,
                width = SIZE_WIDTH
            );
            if let Err(source) = writeln!(out, "{line}") {
                io_err = Some(source);
            }
        },
    );

    if let Some(source) = io_err {
        return Err(CoreError::OutputSinkFailure(source));
    }
    Ok(())
}

/// Walk `root`, writing one folder-collection line per directory:
/// `serial \t path \t num_files \t num_readable`, where `num_readable` is
/// `-1` when `opts.fast` is set.
pub fn collect_folders(root: &Path, out: &mut dyn Write, opts: &WalkOptions) -> Result<(), CoreError> {
    let base = opts.relative_to.clone().unwrap_or_else(|| root.to_path_buf());
    let mut serial: u64 = 0;
    let mut io_err: Option<io::Error> = None;

    let record_folder = |dir: &Path, serial: &mut u64, out: &mut dyn Write, io_err: &mut Option<io::Error>| {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        let mut num_files = 0i64;
        let mut num_readable = 0i64;
        for entry in entries.flatten() {
            num_files += 1;
            if opts.fast {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() && fs::File::open(entry.path()).is_ok() {
                    num_readable += 1;
                }
            }
        }
        let relative = relative_path_string(dir, &base);
        let num_readable = if opts.fast { -1 } else { num_readable };
        let line = format!("{}\t{}\t{}\t{}", serial, relative, num_files, num_readable);
        *serial += 1;
        if let Err(source) = writeln!(out, "{line}") {
            *io_err = Some(source);
        }
    };

    record_folder(root, &mut serial, out, &mut io_err);
    walk(
        root,
        opts,
        |dir| record_folder(dir, &mut serial, out, &mut io_err),
        |_path, _metadata| {},
    );

    if let Some(source) = io_err {
        return Err(CoreError::OutputSinkFailure(source));
    }
    Ok(())
}
