//! Reads one or more index files and materializes their records.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::CoreError;
use crate::record::Record;

/// Read every index file in `paths`, in order, concatenating their records.
///
/// Records within a file keep file order; across files, one file's records
/// all precede the next file's (the same "file order, then across files"
/// iteration the source's multi-file reader used). A line that fails to
/// parse is logged at `warn` level and skipped — it does not abort the
/// load — matching the `MalformedRecord` policy: log, skip, continue.
/// An index file that cannot be opened at all is `CannotOpenIndex`, fatal.
pub fn load_index_files(paths: &[impl AsRef<Path>]) -> Result<Vec<Record>, CoreError> {
    let mut records = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CoreError::CannotOpenIndex {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = match line {
                Ok(l) => l,
                Err(source) => {
                    warn!(file = %path.display(), line = line_no, error = %source, "failed to read line");
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            match Record::parse_line(path, line_no, &line) {
                Ok(record) => records.push(record),
                Err(parse_err) => {
                    warn!("{parse_err}");
                }
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_records_across_multiple_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = dir.path().join("a.idx");
        let p2 = dir.path().join("b.idx");
        std::fs::write(&p1, "1\t0.0\thash1\tfoo/one.txt\n2\t0.0\thash2\tfoo/two.txt\n").unwrap();
        std::fs::write(&p2, "3\t0.0\thash3\tbar/three.txt\n").unwrap();

        let records = load_index_files(&[&p1, &p2]).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(&*records[0].name, "one.txt");
        assert_eq!(&*records[2].name, "three.txt");
    }

    #[test]
    fn skips_malformed_lines_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = dir.path().join("a.idx");
        let mut f = std::fs::File::create(&p1).unwrap();
        writeln!(f, "1\t0.0\thash1\tfoo/one.txt").unwrap();
        writeln!(f, "not a valid line").unwrap();
        writeln!(f, "2\t0.0\thash2\tfoo/two.txt").unwrap();
        drop(f);

        let records = load_index_files(&[&p1]).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_is_cannot_open_index() {
        let err = load_index_files(&["/nonexistent/path/to/index"]).unwrap_err();
        assert!(matches!(err, CoreError::CannotOpenIndex { .. }));
    }
}
