//! Formats the two kinds of finding this crate produces — duplicate files
//! and similar-folder pairs — to a single output sink. Writing is the only
//! side effect in this module; neither format function re-sorts or filters
//! its input, so report order always equals whatever order the upstream
//! pass already settled on.

use std::io::{self, Write};

use crate::grouping::DuplicateGroup;
use crate::pairs::FolderPair;
use crate::record::SIZE_WIDTH;

/// Write one duplicate-file report: a blank line, the fingerprint line
/// (right-padded size, TAB, hash), then one `mtime \t name \t parent` line
/// per member, for every group in turn.
pub fn write_duplicate_files(groups: &[DuplicateGroup], out: &mut dyn Write) -> io::Result<()> {
    for group in groups {
        writeln!(out)?;
        writeln!(out, "{:>width$}\t{}", group.fingerprint.size, group.fingerprint.hash, width = SIZE_WIDTH)?;
        for entry in &group.entries {
            writeln!(out, "{:10.4}\t{}\t{}", entry.mtime, entry.name, entry.parent)?;
        }
    }
    Ok(())
}

/// Write the similar-folders report: for each folder pair, the two folder
/// paths, a `--------` separator, one `nameA \t nameB` line per shared
/// file, then a blank line.
pub fn write_folder_pairs(pairs: &[FolderPair], out: &mut dyn Write) -> io::Result<()> {
    for pair in pairs {
        writeln!(out, "{}", pair.a)?;
        writeln!(out, "{}", pair.b)?;
        writeln!(out, "--------")?;
        for (name_a, name_b) in &pair.file_pairs {
            writeln!(out, "{}\t{}", name_a, name_b)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Serialize duplicate-file groups as a JSON array, one element per group.
#[cfg(feature = "json")]
pub fn write_duplicate_files_json(groups: &[DuplicateGroup], out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(out, groups).map_err(io::Error::from)
}

/// Serialize folder pairs as a JSON array, one element per pair.
#[cfg(feature = "json")]
pub fn write_folder_pairs_json(pairs: &[FolderPair], out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(out, pairs).map_err(io::Error::from)
}
