//! Groups index records that share a fingerprint into duplicate-file
//! groups of two or more entries.

use std::rc::Rc;

use crate::record::{Fingerprint, Parent, Record};

/// One file within a duplicate-file group: where it lives and when it was
/// last modified. The hash/size are on the owning [`DuplicateGroup`], not
/// repeated here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DuplicateEntry {
    pub parent: Parent,
    pub name: Rc<str>,
    pub mtime: f64,
}

/// Two or more files, across one or more folders, with an identical
/// fingerprint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DuplicateGroup {
    pub fingerprint: Fingerprint,
    pub entries: Vec<DuplicateEntry>,
}

/// Stable-sort `records` by fingerprint, then emit a [`DuplicateGroup`] for
/// every run of two or more consecutive records sharing that fingerprint.
///
/// A run of exactly one record (a file with no duplicate anywhere in the
/// index) produces no group — it is simply dropped, not emitted as a
/// singleton. Within each group, entries are re-sorted by `(parent, name)`
/// component-wise (not by re-joining the path into a string — see
/// [`Parent`]'s own `Ord`), so report order is independent of the index
/// file's original record order.
pub fn group_duplicate_files(mut records: Vec<Record>) -> Vec<DuplicateGroup> {
    records.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));

    let mut groups = Vec::new();
    let mut iter = records.into_iter().peekable();
    while let Some(first) = iter.next() {
        let fingerprint = first.fingerprint.clone();
        let mut entries = vec![DuplicateEntry {
            parent: first.parent,
            name: first.name,
            mtime: first.mtime,
        }];
        while let Some(next) = iter.peek() {
            if next.fingerprint != fingerprint {
                break;
            }
            let next = iter.next().unwrap();
            entries.push(DuplicateEntry {
                parent: next.parent,
                name: next.name,
                mtime: next.mtime,
            });
        }
        if entries.len() >= 2 {
            entries.sort_by(|a, b| (&a.parent, &a.name).cmp(&(&b.parent, &b.name)));
            groups.push(DuplicateGroup { fingerprint, entries });
        }
    }
    groups
}
