//! End-to-end coverage of the full duplicate-file/similar-folder pipeline
//! and the tree-pruning front end, exercising each module's behavior
//! straight through the public API instead of just its own unit tests.

use std::io::Write;

use dupe_sleuth::collapse::collapse_folder_groups;
use dupe_sleuth::grouping::group_duplicate_files;
use dupe_sleuth::index::load_index_files;
use dupe_sleuth::pairs::{expand_pairs, merge_pairs};
use dupe_sleuth::record::{Parent, Record};
use dupe_sleuth::report;
use dupe_sleuth::stats::run_statistics_pass;
use dupe_sleuth::transpose::{transpose_all, TransposedEntry};

fn write_index(lines: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    dir
}

/// `(10,H,a/x), (10,H,b/y), (10,K,c/z)` groups `a/x` with `b/y`; `c/z`
/// is not a duplicate of anything and is omitted entirely.
#[test]
fn duplicate_detection_groups_equal_fingerprints_only() {
    let dir = write_index(&[
        "10\t0.0\tH\ta/x",
        "10\t0.0\tH\tb/y",
        "10\t0.0\tK\tc/z",
    ]);
    let records = load_index_files(&[dir.path().join("idx.txt")]).unwrap();
    let groups = group_duplicate_files(records);

    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.entries.len(), 2);
    let names: Vec<&str> = group.entries.iter().map(|e| e.name.as_ref()).collect();
    assert_eq!(names, vec!["x", "y"]);
}

/// Two duplicate-file groups that both span folders `a` and `b` should
/// collapse into one folder group and expand to exactly one folder pair
/// `(a, b)` with both files' names paired up.
#[test]
fn full_pipeline_collapses_two_groups_sharing_a_folder_pair_into_one() {
    let dir = write_index(&[
        "10\t0.0\tH1\ta/x",
        "10\t0.0\tH1\tb/y",
        "20\t0.0\tH2\ta/p",
        "20\t0.0\tH2\tb/q",
    ]);
    let records = load_index_files(&[dir.path().join("idx.txt")]).unwrap();
    let groups = group_duplicate_files(records);
    assert_eq!(groups.len(), 2);

    let transposed = transpose_all(&groups);
    let folder_groups = collapse_folder_groups(transposed);
    assert_eq!(folder_groups.len(), 1, "both groups span exactly {{a, b}}");
    assert_eq!(folder_groups[0].name_rows.len(), 2);

    let proto_pairs = expand_pairs(&folder_groups);
    assert_eq!(proto_pairs.len(), 1, "k=2 folders -> k*(k-1)/2 = 1 pair");

    let pairs = merge_pairs(proto_pairs);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].file_pairs.len(), 2);

    let mut out = Vec::new();
    report::write_folder_pairs(&pairs, &mut out).unwrap();
    let rendered = String::from_utf8(out).unwrap();
    assert!(rendered.contains("a\nb\n--------"));
}

/// Folder sets that differ only in component order do not merge.
#[test]
fn collapser_does_not_merge_folder_sets_with_different_order() {
    let a = Parent::from_components(["a"]);
    let b = Parent::from_components(["b"]);
    let entries = vec![
        TransposedEntry {
            parents: vec![a.clone(), b.clone()],
            names: vec!["x".into(), "y".into()],
        },
        TransposedEntry {
            parents: vec![b, a],
            names: vec!["x".into(), "y".into()],
        },
    ];
    let folder_groups = collapse_folder_groups(entries);
    assert_eq!(folder_groups.len(), 2, "[a,b] and [b,a] are distinct folder sets");
}

/// A folder group of k folders yields exactly k*(k-1)/2 proto-pairs.
#[test]
fn pair_expander_count_matches_triangular_number() {
    let dir = write_index(&[
        "10\t0.0\tH\ta/x",
        "10\t0.0\tH\tb/x",
        "10\t0.0\tH\tc/x",
        "10\t0.0\tH\td/x",
    ]);
    let records = load_index_files(&[dir.path().join("idx.txt")]).unwrap();
    let groups = group_duplicate_files(records);
    let transposed = transpose_all(&groups);
    let folder_groups = collapse_folder_groups(transposed);
    assert_eq!(folder_groups.len(), 1);
    let proto_pairs = expand_pairs(&folder_groups);
    assert_eq!(proto_pairs.len(), 4 * 3 / 2);
}

/// Run through the public `stats` entry point rather than its own unit
/// tests directly: a file unique to a two-level chain prunes the whole
/// chain, while files that share content elsewhere survive.
#[test]
fn statistics_pass_prunes_unshared_chains_but_keeps_shared_ones() {
    let dir = write_index(&[
        "10\t0.0\tonly\tf3/f8/solo.txt",
        "10\t0.0\tdup\ta/b/one.txt",
        "10\t0.0\tdup\tc/d/two.txt",
    ]);
    let records = load_index_files(&[dir.path().join("idx.txt")]).unwrap();
    let root = run_statistics_pass(&records);

    assert!(root.borrow().children.get("f3").is_none());
    assert!(root.borrow().children.get("a").is_some());
    assert!(root.borrow().children.get("c").is_some());
}

#[cfg(feature = "json")]
#[test]
fn json_report_round_trips_through_serde_json() {
    let dir = write_index(&["10\t0.0\tH\ta/x", "10\t0.0\tH\tb/y"]);
    let records = load_index_files(&[dir.path().join("idx.txt")]).unwrap();
    let groups = group_duplicate_files(records);

    let mut out = Vec::new();
    report::write_duplicate_files_json(&groups, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(value.is_array());
    assert_eq!(value.as_array().unwrap().len(), 1);
}

/// Malformed lines are skipped, not fatal, and a missing index file is a
/// hard (fatal) error.
#[test]
fn loader_skips_malformed_lines_and_fails_hard_on_missing_files() {
    let dir = write_index(&["not a valid index line", "10\t0.0\tH\ta/x"]);
    let records = load_index_files(&[dir.path().join("idx.txt")]).unwrap();
    assert_eq!(records.len(), 1);

    let err = load_index_files(&[dir.path().join("missing.txt")]).unwrap_err();
    assert!(matches!(err, dupe_sleuth::error::CoreError::CannotOpenIndex { .. }));
}

/// Re-rendering a parsed record with `to_index_line` and re-parsing it
/// yields an equal record.
#[test]
fn idempotence_on_reparse() {
    let dir = write_index(&["10\t1.5000\tH\ta/b/x.txt"]);
    let records = load_index_files(&[dir.path().join("idx.txt")]).unwrap();
    let original = &records[0];

    let rendered = original.to_index_line();
    let reparsed = Record::parse_line(std::path::Path::new("roundtrip"), 1, &rendered).unwrap();
    assert_eq!(original, &reparsed);
}
